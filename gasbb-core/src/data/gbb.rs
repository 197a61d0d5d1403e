//! Gas Bulletin Board report source.
//!
//! Downloads CSV reports from the public bulletin-board report directory
//! (`https://nemweb.com.au/Reports/Current/GBB/` by default). One GET per
//! report, bounded by the configured timeout. No retries: any transport error
//! or non-success status goes straight back to the caller.

use super::provider::{DataError, ReportSource};
use crate::config::ModelConfig;
use std::time::Duration;
use tracing::debug;

/// HTTPS report source backed by a blocking reqwest client.
pub struct GbbSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl GbbSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self, DataError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    /// Full URL for a report: base URL joined with the filename.
    pub fn report_url(&self, filename: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{filename}", self.base_url)
        } else {
            format!("{}/{filename}", self.base_url)
        }
    }
}

impl ReportSource for GbbSource {
    fn name(&self) -> &str {
        "gas_bulletin_board"
    }

    fn fetch(&self, filename: &str) -> Result<Vec<u8>, DataError> {
        let url = self.report_url(filename);
        debug!(%url, "requesting report");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(format!("{url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp
            .bytes()
            .map_err(|e| DataError::NetworkUnreachable(format!("reading body of {url}: {e}")))?;
        Ok(body.to_vec())
    }
}
