//! Planar similarity transforms in homogeneous form.

use crate::types::{Drawing, Point, Stroke};
use nalgebra::{Matrix3, Vector3};

pub fn translation(dx: f64, dy: f64) -> Matrix3<f64> {
    Matrix3::new(1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0)
}

pub fn uniform_scale(s: f64) -> Matrix3<f64> {
    Matrix3::new(s, 0.0, 0.0, 0.0, s, 0.0, 0.0, 0.0, 1.0)
}

/// Apply an affine transform (last row `[0, 0, 1]`) to a point.
#[inline]
pub fn apply_point(m: &Matrix3<f64>, p: Point) -> Point {
    let v = m * Vector3::new(p.x, p.y, 1.0);
    Point::new(v[0], v[1])
}

pub fn apply_points(m: &Matrix3<f64>, pts: &[Point]) -> Vec<Point> {
    pts.iter().map(|&p| apply_point(m, p)).collect()
}

/// Transformed copy of `drawing`; the canvas size is carried over unchanged.
pub fn apply_drawing(m: &Matrix3<f64>, drawing: &Drawing) -> Drawing {
    debug_assert!(
        m[(2, 0)] == 0.0 && m[(2, 1)] == 0.0 && m[(2, 2)] == 1.0,
        "expected an affine transform"
    );
    Drawing {
        strokes: drawing
            .strokes
            .iter()
            .map(|s| Stroke::new(apply_points(m, &s.points)))
            .collect(),
        width: drawing.width,
        height: drawing.height,
    }
}
