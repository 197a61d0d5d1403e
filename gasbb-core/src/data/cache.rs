//! Report cache: one file per logical report, refreshed when stale.
//!
//! Layout: `{cache_dir}/{remote filename}`
//!
//! A cached file is reused until its modification time is more than
//! `max_age` in the past; after that (or when forced, or when absent) the
//! report is downloaded again and the file replaced in place. Nothing is ever
//! deleted by the cache.
//!
//! There is no locking: a single process is expected to own the directory.

use super::fetch::Fetcher;
use super::provider::{DataError, ReportSource};
use super::report::{CachedReport, ReportKey};
use crate::config::{ModelConfig, ReportFiles};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Directory-backed report cache with a staleness policy.
pub struct ReportCache {
    cache_dir: PathBuf,
    files: ReportFiles,
    max_age: Duration,
    fetcher: Fetcher,
}

impl ReportCache {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        files: ReportFiles,
        max_age: Duration,
        source: Box<dyn ReportSource>,
    ) -> Self {
        let cache_dir = cache_dir.into();
        Self {
            fetcher: Fetcher::new(source, cache_dir.clone()),
            cache_dir,
            files,
            max_age,
        }
    }

    pub fn from_config(config: &ModelConfig, source: Box<dyn ReportSource>) -> Self {
        Self::new(
            config.cache_dir.clone(),
            config.files.clone(),
            config.max_age(),
            source,
        )
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path the report for `key` is (or would be) cached at.
    pub fn path_for(&self, key: ReportKey) -> PathBuf {
        self.cache_dir.join(self.files.filename(key))
    }

    /// Return a local path holding the report for `key`, downloading it first
    /// when `force` is set, when nothing is cached, or when the cached copy is
    /// stale.
    pub fn resolve(&self, key: ReportKey, force: bool) -> Result<PathBuf, DataError> {
        fs::create_dir_all(&self.cache_dir).map_err(|e| DataError::io(&self.cache_dir, e))?;

        let path = self.path_for(key);
        let reason = if force {
            Some("forced")
        } else if !path.exists() {
            Some("not cached")
        } else if self.is_stale(&path)? {
            Some("stale")
        } else {
            None
        };

        match reason {
            Some(reason) => {
                info!(report = %key, reason, "refreshing report");
                self.fetcher.download(self.files.filename(key))
            }
            None => {
                debug!(report = %key, path = %path.display(), "using cached report");
                Ok(path)
            }
        }
    }

    /// True when the file's age exceeds `max_age`. A modification time in the
    /// future counts as age zero.
    pub fn is_stale(&self, path: &Path) -> Result<bool, DataError> {
        Ok(file_age(path)? > self.max_age)
    }

    /// Describe what is cached for every known report.
    pub fn status(&self) -> Result<Vec<CachedReport>, DataError> {
        ReportKey::ALL
            .into_iter()
            .map(|key| self.describe(key))
            .collect()
    }

    fn describe(&self, key: ReportKey) -> Result<CachedReport, DataError> {
        let path = self.path_for(key);
        let filename = self.files.filename(key).to_string();

        if !path.exists() {
            return Ok(CachedReport {
                key,
                filename,
                path,
                cached: false,
                size_bytes: None,
                modified: None,
                stale: true,
                content_hash: None,
            });
        }

        let meta = fs::metadata(&path).map_err(|e| DataError::io(&path, e))?;
        let modified = meta.modified().map_err(|e| DataError::io(&path, e))?;
        let bytes = fs::read(&path).map_err(|e| DataError::io(&path, e))?;

        Ok(CachedReport {
            key,
            filename,
            stale: self.is_stale(&path)?,
            cached: true,
            size_bytes: Some(meta.len()),
            modified: Some(DateTime::<Utc>::from(modified)),
            content_hash: Some(blake3::hash(&bytes).to_hex().to_string()),
            path,
        })
    }
}

fn file_age(path: &Path) -> Result<Duration, DataError> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| DataError::io(path, e))?;
    Ok(SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO))
}
