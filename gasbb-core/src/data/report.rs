//! Logical report keys and cached-report descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One of the three bulletin-board reports the model depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKey {
    /// Actual flow and storage, rolling last 31 days.
    Flows,
    /// Medium-term capacity outlook, future gas days.
    MtoFuture,
    /// Current nameplate rating per facility.
    Nameplate,
}

impl ReportKey {
    pub const ALL: [ReportKey; 3] = [ReportKey::Flows, ReportKey::MtoFuture, ReportKey::Nameplate];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKey::Flows => "flows",
            ReportKey::MtoFuture => "mto_future",
            ReportKey::Nameplate => "nameplate",
        }
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ReportKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown report '{s}'. Valid: flows, mto_future, nameplate"))
    }
}

/// What the cache currently holds for one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedReport {
    pub key: ReportKey,
    pub filename: String,
    pub path: PathBuf,
    pub cached: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
    pub stale: bool,
    /// BLAKE3 of the cached bytes.
    pub content_hash: Option<String>,
}
