use super::extractor::ExtractorConfig;
use super::read_json_config;
use crate::dataset::{SplitKind, SplitRatios};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DatasetToolConfig {
    /// UNIPEN files making up the corpus, read in order.
    pub inputs: Vec<PathBuf>,
    /// Directory searched first for `.INCLUDE` files.
    #[serde(default)]
    pub include_dir: Option<PathBuf>,
    /// Label alphabet; defaults to the sorted labels found in the corpus.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub split: SplitRatios,
    /// Shuffle seed; a fresh one is drawn per run when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    pub output: DatasetOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatasetOutputConfig {
    /// Path prefix of the per-split files, e.g. `out/digits`.
    pub prefix: PathBuf,
    /// Optional JSON summary of the per-split batch reports.
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

impl DatasetOutputConfig {
    /// `<prefix>_<split>_<percent>.json`, e.g. `out/digits_train_60.json`.
    pub fn split_path(&self, kind: SplitKind, percent: u32) -> PathBuf {
        let stem = self
            .prefix
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.prefix
            .with_file_name(format!("{stem}_{}_{percent}.json", kind.name()))
    }
}

pub fn load_config(path: &Path) -> Result<DatasetToolConfig, String> {
    read_json_config(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: DatasetToolConfig = serde_json::from_str(
            r#"{"inputs": ["data/a.dat"], "output": {"prefix": "out/digits"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.split, SplitRatios::default());
        assert!(cfg.labels.is_none());
        assert!(cfg.seed.is_none());
        assert!(cfg.include_dir.is_none());
        assert_eq!(
            cfg.output.split_path(SplitKind::Train, 60),
            PathBuf::from("out/digits_train_60.json")
        );
    }

    #[test]
    fn seed_and_include_dir_are_read() {
        let cfg: DatasetToolConfig = serde_json::from_str(
            r#"{"inputs": ["data/a.dat"], "include_dir": "data/include", "seed": 42,
                "output": {"prefix": "out/digits"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.include_dir, Some(PathBuf::from("data/include")));
    }
}
