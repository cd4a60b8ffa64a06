//! Stroke preprocessing: per-stroke deduplication and arc-length resampling,
//! then bridging consecutive strokes into one annotated point sequence.
//!
//! Both stages are public so preview tooling can render the intermediate
//! geometry.

use crate::error::{Error, Result};
use crate::geometry::{arc_count, resample_points};
use crate::types::{AnnotatedPoint, PenState, Point, Stroke};
use log::debug;
use std::collections::HashSet;

/// Drop repeated coordinates, keeping the first occurrence of each.
pub fn dedup_points(points: &[Point]) -> Vec<Point> {
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(points.len());
    points
        .iter()
        .filter(|p| seen.insert((p.x.to_bits(), p.y.to_bits())))
        .copied()
        .collect()
}

/// Deduplicate and resample every stroke at `arc_len` spacing.
///
/// `steps` is the spline evaluation resolution used to measure curve
/// lengths. A stroke that collapses to a single distinct point (a dot) is
/// kept as that point. Fails on an empty stroke, or when the strokes hold
/// fewer than 2 distinct points in total.
pub fn resample_strokes(strokes: &[Stroke], arc_len: f64, steps: usize) -> Result<Vec<Vec<Point>>> {
    let mut out = Vec::with_capacity(strokes.len());
    let mut distinct = 0usize;
    for (idx, stroke) in strokes.iter().enumerate() {
        if stroke.is_empty() {
            return Err(Error::malformed(format!("stroke {idx} is empty")));
        }
        let unique = dedup_points(&stroke.points);
        distinct += unique.len();
        if unique.len() == 1 {
            debug!("stroke {idx} is a single point, kept without resampling");
            out.push(unique);
            continue;
        }
        out.push(resample_points(&unique, arc_len, steps)?);
    }
    if distinct < 2 {
        return Err(Error::malformed(format!(
            "drawing has {distinct} distinct point(s), need at least 2"
        )));
    }
    Ok(out)
}

/// Concatenate resampled strokes into one annotated sequence.
///
/// Between the end of stroke `i` and the start of stroke `i + 1`,
/// `floor(distance / arc_len)` pen-up points are inserted at even spacing,
/// endpoints excluded. Stroke points are marked pen-down.
pub fn connect_stroke_endpoints(strokes: &[Vec<Point>], arc_len: f64) -> Result<Vec<AnnotatedPoint>> {
    if !arc_len.is_finite() || arc_len <= 0.0 {
        return Err(Error::config(format!("arc_len must be positive, got {arc_len}")));
    }
    if strokes.is_empty() {
        return Err(Error::malformed("drawing has no strokes"));
    }
    if let Some(idx) = strokes.iter().position(|s| s.is_empty()) {
        return Err(Error::malformed(format!("resampled stroke {idx} is empty")));
    }

    let capacity = strokes.iter().map(Vec::len).sum();
    let mut out: Vec<AnnotatedPoint> = Vec::with_capacity(capacity);
    let mut prev_end: Option<Point> = None;
    for (idx, stroke) in strokes.iter().enumerate() {
        if let Some(end) = prev_end {
            let start = stroke[0];
            let num = arc_count(end.distance(&start), arc_len)?;
            if num > 0 {
                debug!("bridge {}→{idx}: {num} pen-up point(s)", idx - 1);
            }
            let denom = (num + 1) as f64;
            out.extend((1..=num).map(|k| {
                AnnotatedPoint::new(PenState::Up, end.lerp(&start, k as f64 / denom))
            }));
        }
        out.extend(stroke.iter().map(|&p| AnnotatedPoint::new(PenState::Down, p)));
        prev_end = stroke.last().copied();
    }
    Ok(out)
}
