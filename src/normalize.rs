//! Drawing normalization applied before resampling.
//!
//! Every stage takes a drawing by reference and returns a new one, so the
//! caller's drawing is never modified:
//!
//! - `crop_to_mbr`: move the bounding box to the origin; the canvas becomes
//!   the bounding box size.
//! - `fit_to_box`: uniformly scale the bounding box into a `w × h` canvas.
//! - `normalize_position`: center the bounding box on the canvas.
//! - `smooth`: 3-tap `[1, 2, 1] / 4` filter along each stroke.
//!
//! All stages preserve stroke count and point order.

use crate::transform::{apply_drawing, translation, uniform_scale};
use crate::types::{Drawing, Point, Stroke};
use serde::{Deserialize, Serialize};

/// Symmetric smoothing kernel applied along strokes.
#[derive(Clone, Copy, Debug)]
pub struct SmoothingKernel {
    taps: &'static [f64],
}

impl SmoothingKernel {
    pub const fn new(taps: &'static [f64]) -> Self {
        Self { taps }
    }

    pub fn taps(&self) -> &[f64] {
        self.taps
    }

    /// Points on either side of the center tap.
    pub fn half_width(&self) -> usize {
        self.taps.len() / 2
    }
}

impl Default for SmoothingKernel {
    fn default() -> Self {
        BINOMIAL_3TAP
    }
}

/// Normalised 3-tap binomial kernel `[1, 2, 1] / 4`.
pub const BINOMIAL_3TAP: SmoothingKernel = SmoothingKernel::new(&[0.25, 0.5, 0.25]);

/// Canvas and smoothing settings for `normalize_drawing`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub smoothing: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            canvas_width: 300.0,
            canvas_height: 300.0,
            smoothing: true,
        }
    }
}

pub fn crop_to_mbr(drawing: &Drawing) -> Drawing {
    let Some(bbox) = drawing.bounding_box() else {
        return drawing.clone();
    };
    let mut out = apply_drawing(&translation(-bbox.min.x, -bbox.min.y), drawing);
    out.width = bbox.width();
    out.height = bbox.height();
    out
}

/// Scale factor that fits a `bw × bh` box into `w × h`.
///
/// An axis with zero extent does not constrain the scale; with both axes
/// degenerate the scale is 1.
fn fit_scale(bw: f64, bh: f64, w: f64, h: f64) -> f64 {
    match (bw > 0.0, bh > 0.0) {
        (true, true) => (w / bw).min(h / bh),
        (true, false) => w / bw,
        (false, true) => h / bh,
        (false, false) => 1.0,
    }
}

pub fn fit_to_box(drawing: &Drawing, width: f64, height: f64) -> Drawing {
    let Some(bbox) = drawing.bounding_box() else {
        return Drawing::new(drawing.strokes.clone(), width, height);
    };
    let s = fit_scale(bbox.width(), bbox.height(), width, height);
    let m = uniform_scale(s) * translation(-bbox.min.x, -bbox.min.y);
    let mut out = apply_drawing(&m, drawing);
    out.width = width;
    out.height = height;
    out
}

pub fn normalize_position(drawing: &Drawing) -> Drawing {
    let Some(bbox) = drawing.bounding_box() else {
        return drawing.clone();
    };
    let c = bbox.center();
    apply_drawing(
        &translation(0.5 * drawing.width - c.x, 0.5 * drawing.height - c.y),
        drawing,
    )
}

pub fn smooth(drawing: &Drawing) -> Drawing {
    smooth_with(drawing, &BINOMIAL_3TAP)
}

/// Convolve every stroke with `kernel`; points closer than the kernel half
/// width to a stroke end are kept as they are.
pub fn smooth_with(drawing: &Drawing, kernel: &SmoothingKernel) -> Drawing {
    let half = kernel.half_width();
    let taps = kernel.taps();
    let strokes = drawing
        .strokes
        .iter()
        .map(|stroke| {
            let pts = &stroke.points;
            if pts.len() < taps.len() {
                return stroke.clone();
            }
            let mut out = pts.clone();
            for i in half..pts.len() - half {
                let mut acc = Point::default();
                for (k, &w) in taps.iter().enumerate() {
                    let p = pts[i + k - half];
                    acc.x += w * p.x;
                    acc.y += w * p.y;
                }
                out[i] = acc;
            }
            Stroke::new(out)
        })
        .collect();
    Drawing {
        strokes,
        width: drawing.width,
        height: drawing.height,
    }
}

/// Run the full normalization chain on a copy of `drawing`.
pub fn normalize_drawing(drawing: &Drawing, opts: &NormalizeOptions) -> Drawing {
    let cropped = crop_to_mbr(drawing);
    let fitted = fit_to_box(&cropped, opts.canvas_width, opts.canvas_height);
    let centered = normalize_position(&fitted);
    if opts.smoothing {
        smooth(&centered)
    } else {
        centered
    }
}
