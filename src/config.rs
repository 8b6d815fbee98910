//! Client configuration
//!
//! Defaults cover a local server. Values can be read from a JSON file and
//! overridden from the environment.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::list::{SortSpec, DEFAULT_PER_PAGE};

/// Configuration for a `Client`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:9950`
    pub base_url: String,

    /// Page size requested from list endpoints
    pub per_page: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Ordering used when pushed samples are inserted
    pub samples_sort: SortSpec,

    pub hmm_sort: SortSpec,

    pub users_sort: SortSpec,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9950".to_string(),
            per_page: DEFAULT_PER_PAGE,
            timeout_secs: 30,
            samples_sort: SortSpec::descending("created_at"),
            hmm_sort: SortSpec::ascending("cluster"),
            users_sort: SortSpec::ascending("id"),
        }
    }
}

impl ClientConfig {
    /// Load a configuration file, filling missing fields with defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VIRTOOL_BASE_URL`, `VIRTOOL_PER_PAGE` and `VIRTOOL_TIMEOUT_SECS`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("VIRTOOL_BASE_URL") {
            self.base_url = url;
        }

        if let Some(raw) = lookup("VIRTOOL_PER_PAGE") {
            self.per_page = raw
                .parse()
                .map_err(|_| ClientError::Config(format!("VIRTOOL_PER_PAGE is not a number: {}", raw)))?;
        }

        if let Some(raw) = lookup("VIRTOOL_TIMEOUT_SECS") {
            self.timeout_secs = raw
                .parse()
                .map_err(|_| ClientError::Config(format!("VIRTOOL_TIMEOUT_SECS is not a number: {}", raw)))?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::Config("base_url must not be empty".into()));
        }

        if !(1..=100).contains(&self.per_page) {
            return Err(ClientError::Config(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join an API path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
