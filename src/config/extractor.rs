use crate::extractor::ExtractorParams;
use crate::features::{FeatureMask, FeaturePreset};
use crate::normalize::NormalizeOptions;
use serde::Deserialize;

/// Feature selection: either a preset name (`"basic"`, `"extended"`,
/// `"all"`) or an explicit list of channel names.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeatureSelection {
    Preset(FeaturePreset),
    Names(Vec<String>),
}

impl Default for FeatureSelection {
    fn default() -> Self {
        FeatureSelection::Preset(FeaturePreset::All)
    }
}

impl FeatureSelection {
    pub fn to_mask(&self) -> Result<FeatureMask, String> {
        match self {
            FeatureSelection::Preset(preset) => Ok(FeatureMask::from(*preset)),
            FeatureSelection::Names(names) => {
                FeatureMask::from_names(names).map_err(|e| e.to_string())
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Resampling distance in canvas units.
    pub arc_len: f64,
    pub curve_length_num: usize,
    /// Neighborhood half-width (points on each side).
    pub vecinity_reach: usize,
    /// Normalization canvas `[width, height]`.
    pub canvas: [f64; 2],
    pub smoothing: bool,
    pub features: FeatureSelection,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let params = ExtractorParams::default();
        Self {
            arc_len: params.arc_len,
            curve_length_num: params.curve_length_num,
            vecinity_reach: params.vecinity_reach,
            canvas: [params.normalize.canvas_width, params.normalize.canvas_height],
            smoothing: params.normalize.smoothing,
            features: FeatureSelection::default(),
        }
    }
}

impl ExtractorConfig {
    /// Build validated extractor parameters.
    pub fn resolve(&self) -> Result<ExtractorParams, String> {
        let params = ExtractorParams {
            arc_len: self.arc_len,
            curve_length_num: self.curve_length_num,
            vecinity_reach: self.vecinity_reach,
            normalize: NormalizeOptions {
                canvas_width: self.canvas[0],
                canvas_height: self.canvas[1],
                smoothing: self.smoothing,
            },
            features: self.features.to_mask()?,
        };
        params.validate().map_err(|e| e.to_string())?;
        Ok(params)
    }
}
