//! Local shape descriptors of a run of consecutive points.

use crate::geometry::dist_point_to_line;
use crate::types::Point;
use serde::Serialize;

/// Shape descriptors of one neighborhood window.
///
/// - `aspect`: `(dx - dy) / (dx + dy)` of the first→last deltas.
/// - `slope_cos`, `slope_sin`: direction of the first→last chord.
/// - `curliness`: trajectory length over `max(dx, dy)`.
/// - `linearity`: mean distance of the window points to the chord.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Neighborhood {
    pub aspect: f64,
    pub slope_cos: f64,
    pub slope_sin: f64,
    pub curliness: f64,
    pub linearity: f64,
}

/// Compute the descriptors of `window`. Degenerate windows (fewer than two
/// points, zero extent) resolve to zeros rather than failing.
pub fn neighborhood_features(window: &[Point]) -> Neighborhood {
    let (first, last) = match window {
        [first, .., last] => (*first, *last),
        _ => return Neighborhood::default(),
    };
    let dx = (last.x - first.x).abs();
    let dy = (last.y - first.y).abs();
    let line_len = dx.hypot(dy);

    let aspect = if dx + dy != 0.0 {
        (dx - dy) / (dx + dy)
    } else {
        0.0
    };
    let (slope_cos, slope_sin) = if line_len != 0.0 {
        (dx / line_len, dy / line_len)
    } else {
        (0.0, 0.0)
    };

    let mut trajectory = 0.0;
    let mut deviation = 0.0;
    for pair in window.windows(2) {
        trajectory += pair[0].distance(&pair[1]);
        deviation += dist_point_to_line(pair[0], first, last);
    }
    // The last point lies on the chord, so skipping it in the loop above is
    // exact; the mean still divides by the full window length.
    let linearity = deviation / window.len() as f64;

    let extent = dx.max(dy);
    let curliness = if extent != 0.0 {
        trajectory / extent
    } else {
        0.0
    };

    Neighborhood {
        aspect,
        slope_cos,
        slope_sin,
        curliness,
        linearity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn identical_points_give_zero_features() {
        let window = pts(&[(7.0, 7.0), (7.0, 7.0)]);
        assert_eq!(neighborhood_features(&window), Neighborhood::default());
    }

    #[test]
    fn short_windows_give_zero_features() {
        assert_eq!(neighborhood_features(&[]), Neighborhood::default());
        assert_eq!(
            neighborhood_features(&pts(&[(1.0, 2.0)])),
            Neighborhood::default()
        );
    }

    #[test]
    fn horizontal_run_is_flat_and_straight() {
        let window = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let n = neighborhood_features(&window);
        assert!(approx_eq(n.aspect, 1.0));
        assert!(approx_eq(n.slope_cos, 1.0) && approx_eq(n.slope_sin, 0.0));
        assert!(approx_eq(n.curliness, 1.0));
        assert!(approx_eq(n.linearity, 0.0));
    }

    #[test]
    fn bent_run_measures_deviation_over_full_window() {
        // Chord from (0,0) to (4,0); the middle point sits 2 above it.
        let window = pts(&[(0.0, 0.0), (2.0, 2.0), (4.0, 0.0)]);
        let n = neighborhood_features(&window);
        assert!(approx_eq(n.aspect, 1.0));
        assert!(approx_eq(n.linearity, 2.0 / 3.0));
        assert!(approx_eq(n.curliness, 2.0 * 8f64.sqrt() / 4.0));
    }

    #[test]
    fn diagonal_run_has_zero_aspect() {
        let window = pts(&[(0.0, 0.0), (-1.0, 1.0), (-3.0, 3.0)]);
        let n = neighborhood_features(&window);
        assert!(approx_eq(n.aspect, 0.0));
        assert!(approx_eq(n.slope_cos, n.slope_sin));
        assert!(approx_eq(n.curliness, 3.0 * 2f64.sqrt() / 3.0));
    }

    #[test]
    fn closed_loop_has_zero_extent() {
        let window = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (0.0, 0.0)]);
        let n = neighborhood_features(&window);
        assert_eq!(n.aspect, 0.0);
        assert_eq!((n.slope_cos, n.slope_sin), (0.0, 0.0));
        assert_eq!(n.curliness, 0.0);
        assert_eq!(n.linearity, 0.0);
    }
}
