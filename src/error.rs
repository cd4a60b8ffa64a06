//! Error type shared by the extraction pipeline and its collaborators.
//!
//! Degenerate geometry (zero-length segments, boundary windows) is never an
//! error; only inputs the pipeline cannot give meaning to end up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Empty drawing, empty stroke, or fewer than 2 distinct points across
    /// all strokes. Single-point strokes on their own are fine.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Parameters the pipeline cannot run with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Syntax problem in a UNIPEN corpus file.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
