//! Report source trait and structured error types.
//!
//! The ReportSource trait abstracts over where report bytes come from (the
//! public bulletin board, or an in-memory fixture in tests). The cache layer
//! sits above this trait; sources don't know about the cache.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for report fetching, caching, and modelling.
///
/// Every variant is fatal to the current call; nothing here is retried.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("cache I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse report '{report}': {reason}")]
    Parse { report: String, reason: String },

    #[error("report '{report}' has no column '{column}'")]
    MissingColumn { report: String, column: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("table transform failed: {0}")]
    Frame(#[from] PolarsError),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Trait for report sources.
///
/// Implementations return the raw bytes of a named report; writing them
/// anywhere is the fetcher's job.
pub trait ReportSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Retrieve the full body of `filename`.
    fn fetch(&self, filename: &str) -> Result<Vec<u8>, DataError>;
}
