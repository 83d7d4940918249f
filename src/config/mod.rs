//! Configuration for the adapter (code > environment).

use std::time::Duration;

use crate::error::{AdapterError, Result};

/// Adapter configuration.
///
/// Only `base_url` is required; everything else defaults to values suitable
/// for an interactive chat front-end. Per-call timeouts are distinct from
/// the run poll loop's overall `run_budget`.
#[derive(Debug, Clone)]
pub struct GangwayConfig {
    /// Base URL of the remote agent-run service.
    pub base_url: String,
    /// Assistant identifier passed when starting a run.
    pub assistant_id: String,
    /// Protocol/version tag, surfaced to the host application.
    pub version: String,
    /// Timeout for create/history/state/status/start calls.
    pub request_timeout: Duration,
    /// Timeout for the transcript join call, which may block server-side.
    pub join_timeout: Duration,
    /// Overall wall-clock budget for polling one run to completion.
    pub run_budget: Duration,
    /// Delay between run status polls.
    pub poll_interval: Duration,
    /// Minimum cadence of liveness lines while a run is in flight.
    pub liveness_interval: Duration,
}

impl Default for GangwayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            assistant_id: "agent".to_string(),
            version: "1.0".to_string(),
            request_timeout: Duration::from_secs(10),
            join_timeout: Duration::from_secs(30),
            run_budget: Duration::from_secs(120),
            poll_interval: Duration::from_secs(2),
            liveness_interval: Duration::from_secs(8),
        }
    }
}

impl GangwayConfig {
    /// Load from environment variables (`GANGWAY_BASE_URL`,
    /// `GANGWAY_ASSISTANT_ID`, `GANGWAY_VERSION`), reading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Ok(url) = std::env::var("GANGWAY_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(id) = std::env::var("GANGWAY_ASSISTANT_ID") {
            config.assistant_id = id;
        }
        if let Ok(version) = std::env::var("GANGWAY_VERSION") {
            config.version = version;
        }

        config
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(AdapterError::Configuration(
                "base_url is not set".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(AdapterError::Configuration(
                "poll_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
