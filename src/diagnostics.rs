//! What `FeatureExtractor::extract_with_trace` reports besides the features:
//! how many points each stage produced and how long it took.

use serde::{Deserialize, Serialize};

/// Wall-clock milliseconds spent in one named extraction stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Stage timings in execution order; `total_ms` spans the whole run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }
}

/// Point counts and timings of a single `FeatureExtractor` run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input_strokes: usize,
    pub input_points: usize,
    /// Pen-down points after resampling.
    pub resampled_points: usize,
    /// Synthetic pen-up points inserted between strokes.
    pub bridge_points: usize,
    /// Feature vectors emitted (equals resampled + bridge points).
    pub timesteps: usize,
    pub feature_width: usize,
    pub timings: TimingBreakdown,
}

#[inline]
pub(crate) fn elapsed_ms(start: std::time::Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_serializes_with_camel_case_keys() {
        let mut timings = TimingBreakdown::default();
        timings.push("resample", 0.5);
        let trace = PipelineTrace {
            resampled_points: 4,
            timings,
            ..Default::default()
        };
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["resampledPoints"], 4);
        assert_eq!(json["timings"]["stages"][0]["label"], "resample");
        assert_eq!(json["timings"]["stages"][0]["elapsedMs"], 0.5);
    }
}
