#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod dataset;
pub mod diagnostics;
pub mod error;
pub mod extractor;
pub mod features;
pub mod types;
pub mod unipen;

// Building blocks – public so stages can be run and inspected on their own.
pub mod geometry;
pub mod normalize;
pub mod preprocess;
pub mod transform;

// Tool support.
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

// Main entry points: extractor + its parameters.
pub use crate::extractor::{ExtractorParams, FeatureExtractor};
pub use crate::features::{Feature, FeatureMask, FeaturePreset};
pub use crate::types::{
    AnnotatedPoint, Drawing, FeatureSequence, FeatureVector, PenState, Point, Stroke,
};

pub use crate::error::{Error, Result};

// Dataset construction.
pub use crate::dataset::{BatchReport, DatasetBuilder, LabeledDrawing, TrainingSet};

pub use crate::diagnostics::PipelineTrace;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use stroke_features::prelude::*;
///
/// # fn main() -> stroke_features::Result<()> {
/// let drawing = Drawing::from_strokes(vec![
///     Stroke::from(vec![(0.0, 0.0), (10.0, 0.0)]),
///     Stroke::from(vec![(20.0, 0.0), (20.0, 10.0)]),
/// ]);
/// let extractor = FeatureExtractor::new(ExtractorParams {
///     features: FeatureMask::basic(),
///     ..Default::default()
/// });
/// for row in extractor.extract(&drawing)? {
///     println!("pen={} x={:.1} y={:.1}", row[0], row[1], row[2]);
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::{
        Drawing, ExtractorParams, FeatureExtractor, FeatureMask, PenState, Point, Stroke,
    };
}
