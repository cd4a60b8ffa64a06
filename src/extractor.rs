//! Feature extraction pipeline orchestrating normalization, resampling,
//! stroke bridging and per-point feature computation.
//!
//! The [`FeatureExtractor`] exposes a simple API: feed a drawing and get one
//! feature vector per point of the resampled, bridged sequence.
//!
//! Typical usage:
//! ```no_run
//! use stroke_features::{Drawing, ExtractorParams, FeatureExtractor, FeatureMask, Stroke};
//!
//! # fn example() -> stroke_features::Result<()> {
//! let drawing = Drawing::from_strokes(vec![
//!     Stroke::from(vec![(0.0, 0.0), (40.0, 60.0), (80.0, 0.0)]),
//!     Stroke::from(vec![(20.0, 30.0), (60.0, 30.0)]),
//! ]);
//! let extractor = FeatureExtractor::new(ExtractorParams {
//!     features: FeatureMask::extended(),
//!     ..Default::default()
//! });
//! let sequence = extractor.extract(&drawing)?;
//! println!("{} timesteps x {} features", sequence.len(), extractor.width());
//! # Ok(())
//! # }
//! ```

// Stages
// - Normalize: crop, fit into the canvas, center, smooth (on a copy).
// - Resample: dedup + arc-length resampling per stroke.
// - Bridge: pen-up points between consecutive strokes.
// - Features: direction, curvature and neighborhood shape per point,
//   projected through the active feature mask.

use crate::diagnostics::{elapsed_ms, PipelineTrace};
use crate::error::{Error, Result};
use crate::features::{point_features, FeatureMask, NeighborhoodWindow};
use crate::normalize::{normalize_drawing, NormalizeOptions};
use crate::preprocess::{connect_stroke_endpoints, resample_strokes};
use crate::types::{AnnotatedPoint, Drawing, FeatureSequence, PenState, Point};
use log::debug;
use std::time::Instant;

/// Parameters controlling the extraction pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractorParams {
    /// Resampling distance between consecutive points (canvas units).
    pub arc_len: f64,
    /// Spline evaluation count used when measuring curve lengths.
    pub curve_length_num: usize,
    /// Half-width of the neighborhood window.
    pub vecinity_reach: usize,
    pub normalize: NormalizeOptions,
    /// Channels included in emitted vectors.
    pub features: FeatureMask,
}

impl Default for ExtractorParams {
    fn default() -> Self {
        Self {
            arc_len: 30.0,
            curve_length_num: 500,
            vecinity_reach: 3,
            normalize: NormalizeOptions::default(),
            features: FeatureMask::all(),
        }
    }
}

impl ExtractorParams {
    pub fn validate(&self) -> Result<()> {
        if !self.arc_len.is_finite() || self.arc_len <= 0.0 {
            return Err(Error::config(format!(
                "arc_len must be positive, got {}",
                self.arc_len
            )));
        }
        if self.curve_length_num < 2 {
            return Err(Error::config(format!(
                "curve_length_num must be at least 2, got {}",
                self.curve_length_num
            )));
        }
        let canvas = [self.normalize.canvas_width, self.normalize.canvas_height];
        if canvas.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(Error::config(format!(
                "canvas must be positive, got {}x{}",
                canvas[0], canvas[1]
            )));
        }
        Ok(())
    }
}

/// Stateless feature extractor; `extract` may be called concurrently.
#[derive(Clone, Debug, Default)]
pub struct FeatureExtractor {
    params: ExtractorParams,
}

impl FeatureExtractor {
    pub fn new(params: ExtractorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ExtractorParams {
        &self.params
    }

    /// Width of every emitted feature vector.
    pub fn width(&self) -> usize {
        self.params.features.width()
    }

    /// Replace the active feature mask.
    pub fn set_features(&mut self, mask: FeatureMask) {
        self.params.features = mask;
    }

    /// Update the resampling distance.
    pub fn set_arc_len(&mut self, arc_len: f64) {
        self.params.arc_len = arc_len;
    }

    /// Extract the feature sequence of `drawing`.
    pub fn extract(&self, drawing: &Drawing) -> Result<FeatureSequence> {
        self.extract_with_trace(drawing).map(|(seq, _)| seq)
    }

    /// Normalized, resampled and bridged point sequence of `drawing`.
    pub fn annotate(&self, drawing: &Drawing) -> Result<Vec<AnnotatedPoint>> {
        self.params.validate()?;
        let normalized = self.normalized(drawing)?;
        self.resample_and_bridge(&normalized)
    }

    /// Extract features and capture per-stage timings and point counts.
    pub fn extract_with_trace(&self, drawing: &Drawing) -> Result<(FeatureSequence, PipelineTrace)> {
        let total_start = Instant::now();
        self.params.validate()?;
        let mut trace = PipelineTrace {
            input_strokes: drawing.stroke_count(),
            input_points: drawing.point_count(),
            feature_width: self.width(),
            ..Default::default()
        };

        let stage_start = Instant::now();
        let normalized = self.normalized(drawing)?;
        trace.timings.push("normalize", elapsed_ms(stage_start));

        let stage_start = Instant::now();
        let annotated = self.resample_and_bridge(&normalized)?;
        trace.timings.push("resample", elapsed_ms(stage_start));
        trace.bridge_points = annotated.iter().filter(|p| p.pen == PenState::Up).count();
        trace.resampled_points = annotated.len() - trace.bridge_points;

        let stage_start = Instant::now();
        let sequence = self.compute_features(&annotated);
        trace.timings.push("features", elapsed_ms(stage_start));
        trace.timesteps = sequence.len();
        trace.timings.total_ms = elapsed_ms(total_start);

        debug!(
            "FeatureExtractor::extract strokes={} points={} -> timesteps={} (bridge={}) width={}",
            trace.input_strokes,
            trace.input_points,
            trace.timesteps,
            trace.bridge_points,
            trace.feature_width
        );
        Ok((sequence, trace))
    }

    fn normalized(&self, drawing: &Drawing) -> Result<Drawing> {
        if drawing.strokes.is_empty() {
            return Err(Error::malformed("drawing has no strokes"));
        }
        Ok(normalize_drawing(drawing, &self.params.normalize))
    }

    fn resample_and_bridge(&self, drawing: &Drawing) -> Result<Vec<AnnotatedPoint>> {
        let resampled = resample_strokes(
            &drawing.strokes,
            self.params.arc_len,
            self.params.curve_length_num,
        )?;
        connect_stroke_endpoints(&resampled, self.params.arc_len)
    }

    fn compute_features(&self, annotated: &[AnnotatedPoint]) -> FeatureSequence {
        let coords: Vec<Point> = annotated.iter().map(AnnotatedPoint::point).collect();
        let Some(mut window) = NeighborhoodWindow::new(annotated.len(), self.params.vecinity_reach)
        else {
            return FeatureSequence::new();
        };
        let mask = &self.params.features;
        let mut out = Vec::with_capacity(annotated.len());
        for i in 0..annotated.len() {
            let row = point_features(annotated, &coords, i, &window);
            out.push(mask.project(&row));
            window.advance();
        }
        out
    }
}
