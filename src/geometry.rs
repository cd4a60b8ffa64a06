//! Geometry primitives used by the stroke preprocessor and the feature
//! computer.
//!
//! - `curve_length` / `resample_points`: arc-length measurement and uniform
//!   resampling, through an interpolating spline for strokes with more than
//!   three points.
//! - `writing_direction` / `curvature`: cosine and sine pairs of local angles
//!   computed over absolute coordinate deltas.
//! - `dist_point_to_line`: perpendicular distance helper.

pub mod spline;

use crate::error::{Error, Result};
use crate::types::Point;
pub use spline::ParametricSpline;

/// Most points a single stroke resampling or stroke bridge may produce.
pub const MAX_ARC_POINTS: usize = 1 << 20;

/// `floor(length / arc_len)` as a point count.
///
/// Non-finite lengths are malformed input; counts above [`MAX_ARC_POINTS`]
/// mean `arc_len` is too small for the geometry.
pub fn arc_count(length: f64, arc_len: f64) -> Result<usize> {
    if !length.is_finite() {
        return Err(Error::malformed(format!("non-finite curve length {length}")));
    }
    let n = (length / arc_len).floor();
    if !(0.0..=MAX_ARC_POINTS as f64).contains(&n) {
        return Err(Error::config(format!(
            "arc_len {arc_len} splits length {length} into {n} arcs (limit {MAX_ARC_POINTS})"
        )));
    }
    Ok(n as usize)
}

/// Sum of consecutive segment lengths.
#[inline]
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// `count` evenly spaced points from `a` to `b`, both ends included.
pub fn linspace(a: Point, b: Point, count: usize) -> Vec<Point> {
    match count {
        0 => Vec::new(),
        1 => vec![a],
        _ => {
            let denom = (count - 1) as f64;
            (0..count).map(|i| a.lerp(&b, i as f64 / denom)).collect()
        }
    }
}

/// Length of the curve through `points`, truncated towards zero.
///
/// With more than three points the length is measured along the
/// interpolating spline sampled at `steps` parameters, which removes most of
/// the bias sparse digitizer sampling puts on the raw polyline length.
pub fn curve_length(points: &[Point], steps: usize) -> f64 {
    let length = if points.len() > 3 {
        match ParametricSpline::fit(points) {
            Some(spline) => polyline_length(&spline.sample(steps.max(2))),
            None => 0.0,
        }
    } else {
        polyline_length(points)
    };
    length.trunc()
}

/// Resample `points` so consecutive outputs sit roughly `arc_len` apart
/// along the curve.
///
/// The number of arcs is `n = floor(curve_length / arc_len)`. Two- and
/// three-point strokes are interpolated linearly (`n + 2` steps per
/// segment); longer strokes are evaluated on the spline at `max(n, 2)`
/// parameters so both endpoints survive.
pub fn resample_points(points: &[Point], arc_len: f64, steps: usize) -> Result<Vec<Point>> {
    if !arc_len.is_finite() || arc_len <= 0.0 {
        return Err(Error::config(format!("arc_len must be positive, got {arc_len}")));
    }
    if points.len() < 2 {
        return Err(Error::malformed(format!(
            "cannot resample a stroke of {} point(s)",
            points.len()
        )));
    }

    let n = arc_count(curve_length(points, steps), arc_len)?;
    match points.len() {
        2 => Ok(linspace(points[0], points[1], n + 2)),
        3 => {
            let mut out = linspace(points[0], points[1], n + 2);
            out.extend(linspace(points[1], points[2], n + 2).into_iter().skip(1));
            Ok(out)
        }
        _ => {
            let spline = ParametricSpline::fit(points)
                .ok_or_else(|| Error::malformed("stroke points all coincide"))?;
            Ok(spline.sample(n.max(2)))
        }
    }
}

/// Cosine and sine of the direction from `p` towards `next`.
///
/// Only magnitudes of the deltas are used, so the result lies in the first
/// quadrant. At the end of a sequence (`next == None`) the direction is
/// taken as horizontal `(1, 0)`; a coincident `next` yields `(0, 0)`.
#[inline]
pub fn writing_direction(p: Point, next: Option<Point>) -> (f64, f64) {
    let Some(next) = next else {
        return (1.0, 0.0);
    };
    let dx = (next.x - p.x).abs();
    let dy = (next.y - p.y).abs();
    let d = dx.hypot(dy);
    if d != 0.0 {
        (dx / d, dy / d)
    } else {
        (0.0, 0.0)
    }
}

/// Cosine and sine of the angle at vertex `a` of triangle `a, b, c`.
///
/// Missing neighbours yield `(1, 0)`. A zero-length side adjacent to `a`
/// forces `cos = 1`. A law-of-cosines ratio outside `[-1, 1]` is replaced by
/// angle π with `cos = 1`.
pub fn curvature(a: Point, b: Option<Point>, c: Option<Point>) -> (f64, f64) {
    let (Some(b), Some(c)) = (b, c) else {
        return (1.0, 0.0);
    };
    let d_ab = (a.x - b.x).abs().hypot((a.y - b.y).abs());
    let d_ac = (a.x - c.x).abs().hypot((a.y - c.y).abs());
    let d_bc = (b.x - c.x).abs().hypot((b.y - c.y).abs());

    let mut cos = if d_ab != 0.0 && d_ac != 0.0 {
        (d_ab * d_ab + d_ac * d_ac - d_bc * d_bc) / (2.0 * d_ab * d_ac)
    } else {
        1.0
    };
    let angle = if (-1.0..=1.0).contains(&cos) {
        cos.acos()
    } else {
        cos = 1.0;
        std::f64::consts::PI
    };
    (cos, angle.sin())
}

/// Perpendicular distance from `p` to the line through `a` and `b`
/// (zero when `a` and `b` coincide).
#[inline]
pub fn dist_point_to_line(p: Point, a: Point, b: Point) -> f64 {
    let d = a.distance(&b);
    if d != 0.0 {
        ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / d
    } else {
        0.0
    }
}
