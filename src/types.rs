use serde::{Deserialize, Serialize};

/// Planar pen coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation towards `other` (`t = 0` → self, `t = 1` → other).
    #[inline]
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Points captured during one continuous pen-down motion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<(f64, f64)>> for Stroke {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self {
            points: points.into_iter().map(Point::from).collect(),
        }
    }
}

/// Axis-aligned bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.lerp(&self.max, 0.5)
    }
}

/// One handwritten unit (e.g. a character) on a nominal canvas.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub strokes: Vec<Stroke>,
    pub width: f64,
    pub height: f64,
}

impl Drawing {
    pub fn new(strokes: Vec<Stroke>, width: f64, height: f64) -> Self {
        Self {
            strokes,
            width,
            height,
        }
    }

    /// Drawing whose canvas is the bounding box of its points.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        let mut drawing = Self::new(strokes, 0.0, 0.0);
        if let Some(bbox) = drawing.bounding_box() {
            drawing.width = bbox.max.x;
            drawing.height = bbox.max.y;
        }
        drawing
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    /// True when the drawing holds no points at all.
    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(Stroke::is_empty)
    }

    /// Copy without the strokes that hold no points.
    pub fn without_empty_strokes(&self) -> Drawing {
        Drawing {
            strokes: self
                .strokes
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect(),
            width: self.width,
            height: self.height,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.strokes.iter().flat_map(|s| s.points.iter())
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut iter = self.points();
        let first = *iter.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }
}

/// Pen flag attached to every point of the bridged sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenState {
    /// Synthetic point inserted between two strokes.
    Up = 0,
    /// Point resampled from a captured stroke.
    Down = 1,
}

impl PenState {
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            PenState::Up => 0.0,
            PenState::Down => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPoint {
    pub pen: PenState,
    pub x: f64,
    pub y: f64,
}

impl AnnotatedPoint {
    pub fn new(pen: PenState, p: Point) -> Self {
        Self {
            pen,
            x: p.x,
            y: p.y,
        }
    }

    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Active feature values for a single annotated point.
pub type FeatureVector = Vec<f64>;

/// One feature vector per annotated point of a drawing.
pub type FeatureSequence = Vec<FeatureVector>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_spans_all_strokes() {
        let drawing = Drawing::from_strokes(vec![
            Stroke::from(vec![(1.0, 5.0), (3.0, 2.0)]),
            Stroke::default(),
            Stroke::from(vec![(-2.0, 4.0)]),
        ]);
        let bbox = drawing.bounding_box().unwrap();
        assert_eq!(bbox.min, Point::new(-2.0, 2.0));
        assert_eq!(bbox.max, Point::new(3.0, 5.0));
        assert_eq!(drawing.point_count(), 3);
        assert_eq!(drawing.without_empty_strokes().stroke_count(), 2);
    }

    #[test]
    fn empty_drawing_has_no_bounding_box() {
        let drawing = Drawing::new(vec![Stroke::default()], 10.0, 10.0);
        assert!(drawing.is_empty());
        assert!(drawing.bounding_box().is_none());
    }
}
