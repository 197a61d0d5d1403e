//! In-memory report source.
//!
//! Serves fixed report bodies by filename and counts requests. Used by the
//! test suites, and handy for running the model over locally saved reports.

use super::provider::{DataError, ReportSource};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Report source backed by a filename → body map.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    reports: HashMap<String, Vec<u8>>,
    requests: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, filename: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.reports.insert(filename.into(), body.into());
        self
    }

    /// Number of `fetch` calls made so far, including failed ones.
    ///
    /// Clones share the counter, so a clone kept by a test observes the
    /// requests made through the copy handed to the cache.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl ReportSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, filename: &str) -> Result<Vec<u8>, DataError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.reports
            .get(filename)
            .cloned()
            .ok_or_else(|| DataError::HttpStatus {
                status: 404,
                url: format!("memory://{filename}"),
            })
    }
}
