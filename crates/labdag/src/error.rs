//! Error types for labdag operations.

use crate::order::Cycle;
use std::io;
use thiserror::Error;

/// The error type for labdag operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A product required to exist was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The prerequisite relation contains a cycle, so no order exists.
    #[error("Cycle detected: {cycle}")]
    CycleDetected {
        /// One concrete cycle, each member depending on the next.
        cycle: Cycle,
    },

    /// Input that cannot describe a valid graph (bad file contents, self-loops).
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Text that is not a status.
    #[error("Invalid status '{0}': expected one of 0, 1, 2, to_do, in_progress, done")]
    InvalidStatus(String),

    /// Text that is not a calendar date.
    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// The cycle carried by [`Error::CycleDetected`], if this is one.
    #[must_use]
    pub fn cycle(&self) -> Option<&Cycle> {
        match self {
            Self::CycleDetected { cycle } => Some(cycle),
            _ => None,
        }
    }
}

/// A specialized Result type for labdag operations.
pub type Result<T> = std::result::Result<T, Error>;
