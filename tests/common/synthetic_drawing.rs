use std::f64::consts::PI;
use stroke_features::{Drawing, Point, Stroke};

/// Single zig-zag stroke with `teeth` peaks of height `amplitude`.
pub fn zigzag(teeth: usize, width: f64, amplitude: f64) -> Drawing {
    assert!(teeth > 0, "zigzag needs at least one tooth");
    let step = width / (2 * teeth) as f64;
    let points: Vec<Point> = (0..=2 * teeth)
        .map(|i| {
            let y = if i % 2 == 0 { 0.0 } else { amplitude };
            Point::new(i as f64 * step, y)
        })
        .collect();
    Drawing::from_strokes(vec![Stroke::new(points)])
}

/// Open circular arc sampled with `samples` points, centered at `(r, r)`.
pub fn circle(samples: usize, radius: f64) -> Drawing {
    assert!(samples >= 3, "circle needs at least three samples");
    let points: Vec<Point> = (0..samples)
        .map(|i| {
            let t = 1.9 * PI * i as f64 / (samples - 1) as f64;
            Point::new(radius + radius * t.cos(), radius + radius * t.sin())
        })
        .collect();
    Drawing::from_strokes(vec![Stroke::new(points)])
}

/// Two-stroke "T": a horizontal bar then a vertical stem.
pub fn letter_t(size: f64) -> Drawing {
    Drawing::from_strokes(vec![
        Stroke::from(vec![(0.0, 0.0), (0.5 * size, 0.02 * size), (size, 0.0)]),
        Stroke::from(vec![(0.5 * size, 0.0), (0.5 * size, 0.5 * size), (0.5 * size, size)]),
    ])
}

/// Drawing with a single captured point.
pub fn dot(x: f64, y: f64) -> Drawing {
    Drawing::from_strokes(vec![Stroke::from(vec![(x, y)])])
}
