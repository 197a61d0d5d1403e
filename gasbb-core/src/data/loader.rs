//! Report loader: cache resolution followed by CSV parsing.

use super::cache::ReportCache;
use super::provider::DataError;
use super::report::ReportKey;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Loads reports as polars DataFrames, fetching through the cache as needed.
pub struct ReportLoader {
    cache: ReportCache,
}

impl ReportLoader {
    pub fn new(cache: ReportCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    /// Resolve `key` through the cache (downloading if forced, absent, or
    /// stale) and parse it.
    pub fn load(&self, key: ReportKey, force: bool) -> Result<DataFrame, DataError> {
        let path = self.cache.resolve(key, force)?;
        let df = read_report_csv(&path, key)?;
        debug!(report = %key, rows = df.height(), columns = df.width(), "loaded report");
        Ok(df)
    }
}

/// Parse a report CSV with a header row, inferring column types from the
/// whole file.
pub fn read_report_csv(path: &Path, key: ReportKey) -> Result<DataFrame, DataError> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| DataError::Parse {
            report: key.to_string(),
            reason: e.to_string(),
        })
}
