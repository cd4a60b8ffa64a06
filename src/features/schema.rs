use crate::error::{Error, Result};
use crate::types::FeatureVector;
use serde::{Deserialize, Serialize};

/// Number of channels computed for every point.
pub const FEATURE_COUNT: usize = 12;

/// Feature channels in canonical output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    PenDown,
    X,
    Y,
    WrCos,
    WrSin,
    CurvCos,
    CurvSin,
    VAspect,
    VSlopeCos,
    VSlopeSin,
    VCurliness,
    VLinearity,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::PenDown,
        Feature::X,
        Feature::Y,
        Feature::WrCos,
        Feature::WrSin,
        Feature::CurvCos,
        Feature::CurvSin,
        Feature::VAspect,
        Feature::VSlopeCos,
        Feature::VSlopeSin,
        Feature::VCurliness,
        Feature::VLinearity,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature::PenDown => "pen_down",
            Feature::X => "x",
            Feature::Y => "y",
            Feature::WrCos => "wr_cos",
            Feature::WrSin => "wr_sin",
            Feature::CurvCos => "curv_cos",
            Feature::CurvSin => "curv_sin",
            Feature::VAspect => "v_aspect",
            Feature::VSlopeCos => "v_slope_cos",
            Feature::VSlopeSin => "v_slope_sin",
            Feature::VCurliness => "v_curliness",
            Feature::VLinearity => "v_linearity",
        }
    }

    /// Look a channel up by name. `v_liniarity` is accepted for
    /// `v_linearity`, the spelling used by older feature lists.
    pub fn from_name(name: &str) -> Option<Feature> {
        match name {
            "v_liniarity" => Some(Feature::VLinearity),
            _ => Feature::ALL.into_iter().find(|f| f.name() == name),
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Named channel selections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturePreset {
    /// Pen state and coordinates.
    Basic,
    /// `Basic` plus writing direction and curvature.
    Extended,
    /// Every channel.
    #[default]
    All,
}

/// Per-channel on/off switches applied when a feature vector is emitted.
///
/// Output order is always the canonical order restricted to the active
/// channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureMask {
    active: [bool; FEATURE_COUNT],
}

impl Default for FeatureMask {
    fn default() -> Self {
        Self::all()
    }
}

impl From<FeaturePreset> for FeatureMask {
    fn from(preset: FeaturePreset) -> Self {
        match preset {
            FeaturePreset::Basic => Self::basic(),
            FeaturePreset::Extended => Self::extended(),
            FeaturePreset::All => Self::all(),
        }
    }
}

impl FeatureMask {
    pub const fn all() -> Self {
        Self {
            active: [true; FEATURE_COUNT],
        }
    }

    pub const fn none() -> Self {
        Self {
            active: [false; FEATURE_COUNT],
        }
    }

    pub fn basic() -> Self {
        Self::only(&[Feature::PenDown, Feature::X, Feature::Y])
    }

    pub fn extended() -> Self {
        Self::only(&[
            Feature::PenDown,
            Feature::X,
            Feature::Y,
            Feature::WrCos,
            Feature::WrSin,
            Feature::CurvCos,
            Feature::CurvSin,
        ])
    }

    pub fn only(features: &[Feature]) -> Self {
        let mut mask = Self::none();
        for &f in features {
            mask.active[f.index()] = true;
        }
        mask
    }

    /// Build a mask from channel names; unknown names are rejected.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut mask = Self::none();
        for name in names {
            let name = name.as_ref();
            let feature = Feature::from_name(name)
                .ok_or_else(|| Error::config(format!("unknown feature '{name}'")))?;
            mask.active[feature.index()] = true;
        }
        Ok(mask)
    }

    pub fn set(&mut self, feature: Feature, on: bool) -> &mut Self {
        self.active[feature.index()] = on;
        self
    }

    #[inline]
    pub fn is_active(&self, feature: Feature) -> bool {
        self.active[feature.index()]
    }

    pub fn active(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(|f| self.is_active(*f))
    }

    /// Output vector width.
    pub fn width(&self) -> usize {
        self.active.iter().filter(|&&on| on).count()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.active().map(Feature::name).collect()
    }

    /// Keep the active channels of a full vector, in canonical order.
    pub fn project(&self, full: &[f64; FEATURE_COUNT]) -> FeatureVector {
        full.iter()
            .zip(self.active.iter())
            .filter_map(|(&v, &on)| on.then_some(v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> [f64; FEATURE_COUNT] {
        let mut row = [0.0; FEATURE_COUNT];
        for (i, v) in row.iter_mut().enumerate() {
            *v = i as f64 + 0.5;
        }
        row
    }

    #[test]
    fn presets_have_expected_widths() {
        assert_eq!(FeatureMask::all().width(), 12);
        assert_eq!(FeatureMask::basic().width(), 3);
        assert_eq!(FeatureMask::extended().width(), 7);
        assert_eq!(FeatureMask::default(), FeatureMask::all());
        assert_eq!(
            FeatureMask::from(FeaturePreset::Extended).names(),
            vec!["pen_down", "x", "y", "wr_cos", "wr_sin", "curv_cos", "curv_sin"]
        );
    }

    #[test]
    fn basic_projection_is_prefix_of_full() {
        let row = sample_row();
        let full = FeatureMask::all().project(&row);
        let basic = FeatureMask::basic().project(&row);
        assert_eq!(full.len(), 12);
        assert_eq!(&full[..3], basic.as_slice());
    }

    #[test]
    fn projection_keeps_canonical_order() {
        let mask = FeatureMask::from_names(&["v_linearity", "x", "curv_sin"]).unwrap();
        assert_eq!(mask.project(&sample_row()), vec![1.5, 6.5, 11.5]);
    }

    #[test]
    fn unknown_feature_name_is_rejected() {
        let err = FeatureMask::from_names(&["x", "speed"]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn set_toggles_single_channel() {
        let mut mask = FeatureMask::basic();
        mask.set(Feature::X, false).set(Feature::VAspect, true);
        assert_eq!(
            mask.active().collect::<Vec<_>>(),
            vec![Feature::PenDown, Feature::Y, Feature::VAspect]
        );
    }

    #[test]
    fn names_round_trip() {
        for f in Feature::ALL {
            assert_eq!(Feature::from_name(f.name()), Some(f));
            assert_eq!(Feature::ALL[f.index()], f);
        }
    }

    #[test]
    fn legacy_linearity_spelling_is_accepted() {
        assert_eq!(Feature::from_name("v_liniarity"), Some(Feature::VLinearity));
        let mask = FeatureMask::from_names(&["pen_down", "v_liniarity"]).unwrap();
        assert_eq!(
            mask.active().collect::<Vec<_>>(),
            vec![Feature::PenDown, Feature::VLinearity]
        );
        assert_eq!(Feature::VLinearity.name(), "v_linearity");
    }
}
