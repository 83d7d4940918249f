//! Error types for Gangway.

use thiserror::Error;

use crate::types::RunStatus;

/// Primary error type for all adapter operations.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Agent service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Run failed with status: {0}")]
    RunFailed(RunStatus),

    #[error("Run timed out after {secs} seconds")]
    BudgetExceeded { secs: u64 },

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl AdapterError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error came from the transport or the remote service
    /// rather than from the run itself.
    pub fn is_remote_service_error(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Network(_))
    }

    /// Short host-facing rendering, one line, distinguishing network
    /// failures, run failures, timeouts, and empty responses.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(e) => format!("🌐 Network error: {e}"),
            Self::Api { status, .. } => {
                format!("🌐 Network error: agent service returned status {status}")
            }
            Self::RunFailed(status) => format!("❌ Run failed with status: {status}"),
            Self::BudgetExceeded { secs } => format!("⏰ Run timed out after {secs} seconds"),
            Self::EmptyResponse(what) => format!("❌ {what}"),
            other => format!("⚠️ Unexpected error: {other}"),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AdapterError>;
