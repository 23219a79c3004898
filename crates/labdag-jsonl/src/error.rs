//! Error types for labdag-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for labdag-jsonl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A value could not be serialized to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line could not be parsed into the requested type.
    #[error("line {line_number}: {source}")]
    Parse {
        /// 1-based line number of the offending line.
        line_number: usize,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Input is not line-delimited JSON (for example, invalid UTF-8).
    #[error("Invalid JSONL format: {0}")]
    InvalidFormat(String),
}

impl Error {
    /// Line number the error refers to, if it came from a specific line.
    #[must_use]
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::Parse { line_number, .. } => Some(*line_number),
            _ => None,
        }
    }
}

/// A specialized Result type for labdag-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
