use super::extractor::ExtractorConfig;
use super::read_json_config;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// A serialized `Drawing`.
    #[default]
    Json,
    /// A UNIPEN file; `character` selects the drawing.
    Unipen,
}

#[derive(Debug, Deserialize)]
pub struct PreviewToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub format: InputFormat,
    /// Index of the character to preview in a UNIPEN file.
    #[serde(default)]
    pub character: usize,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    pub output: PreviewOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct PreviewOutputConfig {
    pub json: PathBuf,
    #[serde(default)]
    pub png: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<PreviewToolConfig, String> {
    read_json_config(path)
}
