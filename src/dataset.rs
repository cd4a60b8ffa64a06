//! Training-set construction from labeled drawings.
//!
//! `DatasetBuilder` runs the feature extractor over a batch, skipping (and
//! counting) empty and malformed samples so that one bad drawing never
//! aborts a dataset. Accepted sequences are packed into a columnar
//! `TrainingSet`: per-sequence lengths and target strings plus one flat,
//! timestep-major input matrix of `input_patt_size` columns.
//!
//! `build_splits` shuffles the corpus before cutting it, seeded for
//! reproducible splits.
//!
//! With the `parallel` feature the batch is extracted on the rayon thread
//! pool; the sample order of the output is preserved either way.

use crate::error::{Error, Result};
use crate::extractor::FeatureExtractor;
use crate::types::{Drawing, FeatureSequence};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A drawing together with its target label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledDrawing {
    pub label: String,
    pub drawing: Drawing,
}

impl LabeledDrawing {
    pub fn new(label: impl Into<String>, drawing: Drawing) -> Self {
        Self {
            label: label.into(),
            drawing,
        }
    }
}

/// Columnar training-set layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSet {
    /// Label alphabet of the classification problem.
    pub labels: Vec<String>,
    /// Target label of every sequence.
    pub target_strings: Vec<String>,
    pub seq_lengths: Vec<usize>,
    pub seq_dims: Vec<Vec<usize>>,
    /// Width of every input row.
    pub input_patt_size: usize,
    /// All timesteps of all sequences, row after row.
    pub inputs: Vec<f64>,
}

impl TrainingSet {
    pub fn new(labels: Vec<String>, input_patt_size: usize) -> Self {
        Self {
            labels,
            input_patt_size,
            ..Default::default()
        }
    }

    pub fn num_seqs(&self) -> usize {
        self.seq_lengths.len()
    }

    pub fn num_timesteps(&self) -> usize {
        self.seq_lengths.iter().sum()
    }

    /// Append one sequence; every row must be `input_patt_size` wide.
    pub fn push_sequence(&mut self, target: &str, sequence: &FeatureSequence) -> Result<()> {
        if let Some(row) = sequence.iter().find(|r| r.len() != self.input_patt_size) {
            return Err(Error::config(format!(
                "feature row of width {} does not match input size {}",
                row.len(),
                self.input_patt_size
            )));
        }
        self.inputs.reserve(sequence.len() * self.input_patt_size);
        for row in sequence {
            self.inputs.extend_from_slice(row);
        }
        self.seq_lengths.push(sequence.len());
        self.seq_dims.push(vec![sequence.len()]);
        self.target_strings.push(target.to_string());
        Ok(())
    }

    /// Flattened rows of sequence `idx`.
    pub fn sequence(&self, idx: usize) -> Option<&[f64]> {
        let len = *self.seq_lengths.get(idx)?;
        let start: usize = self.seq_lengths[..idx].iter().sum::<usize>() * self.input_patt_size;
        self.inputs.get(start..start + len * self.input_patt_size)
    }
}

/// Per-batch tally of skipped samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total: usize,
    pub empty: usize,
    pub malformed: usize,
    pub converted: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutcome {
    pub set: TrainingSet,
    pub report: BatchReport,
}

enum SampleOutcome {
    Empty,
    Malformed(Error),
    Converted(FeatureSequence),
}

/// Train / validation / test fractions of a corpus.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitRatios {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.6,
            validation: 0.2,
            test: 0.2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    Train,
    Validation,
    Test,
}

impl SplitKind {
    pub fn name(self) -> &'static str {
        match self {
            SplitKind::Train => "train",
            SplitKind::Validation => "validation",
            SplitKind::Test => "test",
        }
    }
}

impl SplitRatios {
    pub fn validate(&self) -> Result<()> {
        for (kind, v) in self.entries() {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::config(format!(
                    "{} fraction must lie in [0, 1], got {v}",
                    kind.name()
                )));
            }
        }
        if self.train + self.validation + self.test > 1.0 + 1e-9 {
            return Err(Error::config("split fractions add up to more than 1"));
        }
        Ok(())
    }

    pub fn entries(&self) -> [(SplitKind, f64); 3] {
        [
            (SplitKind::Train, self.train),
            (SplitKind::Validation, self.validation),
            (SplitKind::Test, self.test),
        ]
    }

    /// Sample counts per split for a corpus of `total` samples.
    ///
    /// When the fractions cover the whole corpus the test split takes the
    /// remainder left by rounding; otherwise each split takes its own share.
    pub fn sizes(&self, total: usize) -> [(SplitKind, usize); 3] {
        let share = |f: f64| (total as f64 * f).floor() as usize;
        let train = share(self.train);
        let validation = share(self.validation).min(total - train);
        let whole = (self.train + self.validation + self.test - 1.0).abs() < 1e-9;
        let test = if whole {
            total - train - validation
        } else {
            share(self.test).min(total - train - validation)
        };
        [
            (SplitKind::Train, train),
            (SplitKind::Validation, validation),
            (SplitKind::Test, test),
        ]
    }

    /// Percentage tag used in output file names, e.g. `60` for 0.6.
    /// Truncated, so 0.29 (28.999.. after scaling) tags as `28`.
    pub fn percent(&self, kind: SplitKind) -> u32 {
        let f = match kind {
            SplitKind::Train => self.train,
            SplitKind::Validation => self.validation,
            SplitKind::Test => self.test,
        };
        (f * 100.0) as u32
    }
}

/// Extracts and packs feature sequences for one label alphabet.
pub struct DatasetBuilder {
    labels: Vec<String>,
    extractor: FeatureExtractor,
}

impl DatasetBuilder {
    pub fn new(labels: Vec<String>, extractor: FeatureExtractor) -> Self {
        Self { labels, extractor }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    fn process_sample(&self, sample: &LabeledDrawing) -> SampleOutcome {
        let drawing = sample.drawing.without_empty_strokes();
        if drawing.strokes.is_empty() {
            return SampleOutcome::Empty;
        }
        match self.extractor.extract(&drawing) {
            Ok(seq) => SampleOutcome::Converted(seq),
            Err(err) => SampleOutcome::Malformed(err),
        }
    }

    #[cfg(feature = "parallel")]
    fn process_batch(&self, samples: &[LabeledDrawing]) -> Vec<SampleOutcome> {
        samples.par_iter().map(|s| self.process_sample(s)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn process_batch(&self, samples: &[LabeledDrawing]) -> Vec<SampleOutcome> {
        samples.iter().map(|s| self.process_sample(s)).collect()
    }

    /// Build a training set from `samples`, skipping bad ones.
    pub fn build(&self, samples: &[LabeledDrawing]) -> BuildOutcome {
        let mut set = TrainingSet::new(self.labels.clone(), self.extractor.width());
        let mut report = BatchReport {
            total: samples.len(),
            ..Default::default()
        };

        for (idx, (sample, outcome)) in samples
            .iter()
            .zip(self.process_batch(samples))
            .enumerate()
        {
            match outcome {
                SampleOutcome::Empty => report.empty += 1,
                SampleOutcome::Malformed(err) => {
                    warn!("sample {idx} ('{}') skipped: {err}", sample.label);
                    report.malformed += 1;
                }
                SampleOutcome::Converted(seq) => match set.push_sequence(&sample.label, &seq) {
                    Ok(()) => report.converted += 1,
                    Err(err) => {
                        warn!("sample {idx} ('{}') skipped: {err}", sample.label);
                        report.malformed += 1;
                    }
                },
            }
        }

        info!(
            "dataset: {} sample(s), {} converted, {} empty, {} malformed",
            report.total, report.converted, report.empty, report.malformed
        );
        BuildOutcome { set, report }
    }

    /// Shuffle `samples`, partition them into train / validation / test sets
    /// and build each one. The same `seed` always gives the same partition;
    /// `None` draws one from the OS. Splits with a zero fraction are omitted.
    pub fn build_splits(
        &self,
        samples: &[LabeledDrawing],
        ratios: &SplitRatios,
        seed: Option<u64>,
    ) -> Result<Vec<(SplitKind, BuildOutcome)>> {
        ratios.validate()?;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut order: Vec<usize> = (0..samples.len()).collect();
        order.shuffle(&mut rng);

        let mut out = Vec::with_capacity(3);
        let mut start = 0usize;
        for ((kind, size), (_, fraction)) in ratios.sizes(samples.len()).into_iter().zip(ratios.entries()) {
            let end = start + size;
            if fraction > 0.0 {
                info!("{} set size: {size}", kind.name());
                let part: Vec<LabeledDrawing> =
                    order[start..end].iter().map(|&i| samples[i].clone()).collect();
                out.push((kind, self.build(&part)));
            }
            start = end;
        }
        Ok(out)
    }
}
