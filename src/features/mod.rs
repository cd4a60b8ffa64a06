//! Per-point feature computation over a bridged stroke sequence.
//!
//! Every annotated point yields a 12-channel row:
//!
//! - `pen_down`, `x`, `y`: the annotated point itself.
//! - `wr_cos`, `wr_sin`: writing direction towards the next point
//!   (`geometry::writing_direction`).
//! - `curv_cos`, `curv_sin`: angle at the point between its successor and
//!   predecessor (`geometry::curvature`).
//! - `v_aspect`, `v_slope_cos`, `v_slope_sin`, `v_curliness`, `v_linearity`:
//!   shape of the surrounding neighborhood (`neighborhood_features`).
//!
//! Notes
//! - Direction and curvature use absolute coordinate deltas, so mirrored
//!   strokes share the same values. Trained models depend on this encoding.
//! - The neighborhood is a `NeighborhoodWindow` of up to `2 * reach + 1`
//!   points centered on the current position, clipped at sequence ends.
//! - A `FeatureMask` selects which channels end up in the emitted vector.

mod neighborhood;
mod schema;
mod window;

pub use neighborhood::{neighborhood_features, Neighborhood};
pub use schema::{Feature, FeatureMask, FeaturePreset, FEATURE_COUNT};
pub use window::NeighborhoodWindow;

use crate::geometry::{curvature, writing_direction};
use crate::types::{AnnotatedPoint, Point};

/// Full 12-channel row for position `i` of `seq`.
///
/// `coords` mirrors `seq` as plain points and `window` must be positioned
/// at `i`.
pub fn point_features(
    seq: &[AnnotatedPoint],
    coords: &[Point],
    i: usize,
    window: &NeighborhoodWindow,
) -> [f64; FEATURE_COUNT] {
    debug_assert_eq!(window.position(), i);
    let current = seq[i];
    let p = current.point();
    let next = coords.get(i + 1).copied();
    let prev = i.checked_sub(1).map(|j| coords[j]);

    let (wr_cos, wr_sin) = writing_direction(p, next);
    let (curv_cos, curv_sin) = curvature(p, next, prev);
    let hood = neighborhood_features(window.slice(coords));

    [
        current.pen.as_f64(),
        current.x,
        current.y,
        wr_cos,
        wr_sin,
        curv_cos,
        curv_sin,
        hood.aspect,
        hood.slope_cos,
        hood.slope_sin,
        hood.curliness,
        hood.linearity,
    ]
}
