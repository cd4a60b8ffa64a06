//! JSON configuration for the command-line tools.
//!
//! Each tool has its own module with a `load_config(path)` entry point;
//! the extractor section is shared between them.

pub mod dataset;
pub mod extractor;
pub mod preview;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub(crate) fn read_json_config<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
