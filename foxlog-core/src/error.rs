//! Error types for the foxlog core library.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for core operations.
#[derive(Error, Debug)]
pub enum FoxlogError {
    /// The per-war event file could not be created or written.
    #[error("Persistence error on {path}: {source}")]
    Persistence {
        /// File that was being written.
        path: PathBuf,
        /// Underlying CSV / I/O failure.
        #[source]
        source: csv::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FoxlogError {
    /// Wrap a CSV failure for `path`.
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        Self::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, FoxlogError>;
