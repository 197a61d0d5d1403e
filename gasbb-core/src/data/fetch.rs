//! Fetcher: pulls a report from its source and writes it into the cache directory.

use super::provider::{DataError, ReportSource};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Downloads named reports into a fixed directory.
pub struct Fetcher {
    source: Box<dyn ReportSource>,
    cache_dir: PathBuf,
}

impl Fetcher {
    pub fn new(source: Box<dyn ReportSource>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            cache_dir: cache_dir.into(),
        }
    }

    /// Fetch `filename` and write the full body to `{cache_dir}/{filename}`,
    /// replacing whatever was there. Returns the written path.
    pub fn download(&self, filename: &str) -> Result<PathBuf, DataError> {
        let body = self.source.fetch(filename)?;

        fs::create_dir_all(&self.cache_dir).map_err(|e| DataError::io(&self.cache_dir, e))?;
        let path = self.cache_dir.join(filename);
        fs::write(&path, &body).map_err(|e| DataError::io(&path, e))?;

        info!(
            source = self.source.name(),
            file = filename,
            bytes = body.len(),
            "downloaded report"
        );
        Ok(path)
    }
}
