//! Model configuration: report source, cache location, region, freshness.
//!
//! Stored as an optional TOML file. Every field has a default, so an empty
//! file (or no file at all) reproduces the stock WA configuration:
//!
//! ```toml
//! base_url = "https://nemweb.com.au/Reports/Current/GBB/"
//! cache_dir = "data_cache"
//! region = "Whole WA"
//! max_age_hours = 24
//! timeout_secs = 40
//!
//! [files]
//! flows = "GasBBActualFlowStorageLast31.CSV"
//! mto_future = "GasBBMediumTermCapacityOutlookFuture.csv"
//! nameplate = "GasBBNameplateRatingCurrent.csv"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::data::provider::DataError;
use crate::data::report::ReportKey;

pub const DEFAULT_BASE_URL: &str = "https://nemweb.com.au/Reports/Current/GBB/";
pub const DEFAULT_CACHE_DIR: &str = "data_cache";
pub const DEFAULT_REGION: &str = "Whole WA";
pub const DEFAULT_MAX_AGE_HOURS: u64 = 24;
pub const DEFAULT_TIMEOUT_SECS: u64 = 40;

/// Remote filename for each logical report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFiles {
    pub flows: String,
    pub mto_future: String,
    pub nameplate: String,
}

impl ReportFiles {
    pub fn filename(&self, key: ReportKey) -> &str {
        match key {
            ReportKey::Flows => &self.flows,
            ReportKey::MtoFuture => &self.mto_future,
            ReportKey::Nameplate => &self.nameplate,
        }
    }
}

impl Default for ReportFiles {
    fn default() -> Self {
        Self {
            flows: "GasBBActualFlowStorageLast31.CSV".into(),
            mto_future: "GasBBMediumTermCapacityOutlookFuture.csv".into(),
            nameplate: "GasBBNameplateRatingCurrent.csv".into(),
        }
    }
}

/// Everything the pipeline needs to fetch, cache, and model one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Prefix joined with each report filename to form the download URL.
    pub base_url: String,
    pub cache_dir: PathBuf,
    /// Zone name matched exactly (case-sensitive) against flow records.
    pub region: String,
    /// Cached files older than this are re-downloaded.
    pub max_age_hours: u64,
    /// Per-request network timeout.
    pub timeout_secs: u64,
    pub files: ReportFiles,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            region: DEFAULT_REGION.into(),
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            files: ReportFiles::default(),
        }
    }
}

impl ModelConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        toml::from_str(content).map_err(|e| DataError::Config(format!("parse config TOML: {e}")))
    }

    /// Serialize the configuration to TOML.
    pub fn to_toml(&self) -> Result<String, DataError> {
        toml::to_string_pretty(self).map_err(|e| DataError::Config(format!("serialize config: {e}")))
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_hours * 60 * 60)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
