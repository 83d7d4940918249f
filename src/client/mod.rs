//! Remote agent-run service client.

pub mod http;

pub use http::HttpAgentService;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::types::{ChatMessage, RunStatus, TranscriptMessage};

/// One checkpoint record from a thread's state history.
///
/// Histories are ordered most-recent-last; the last record is the anchor
/// candidate for replay.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointRecord {
    #[serde(default)]
    pub checkpoint_id: String,
}

/// Typed operations against the remote agent-run service.
///
/// This is the sole boundary to the network. Every call carries a bounded
/// per-request timeout and fails with [`crate::error::AdapterError`] on any
/// non-2xx response or transport failure.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Create a new thread, returning its identifier.
    async fn create_thread(&self) -> Result<String>;

    /// Fetch the thread's checkpoint history, most-recent-last. May be empty.
    async fn fetch_history(&self, thread_id: &str) -> Result<Vec<CheckpointRecord>>;

    /// Apply one message as a state delta anchored at `checkpoint_id`.
    ///
    /// `as_node` tags which logical node produced the delta and must be
    /// `"__start__"` for user messages, `"generate"` otherwise (see
    /// [`crate::types::Role::as_node`]). Returns the new checkpoint id when
    /// the service reports one.
    async fn patch_state(
        &self,
        thread_id: &str,
        checkpoint_id: &str,
        message: &ChatMessage,
        as_node: &str,
    ) -> Result<Option<String>>;

    /// Start a run over the thread's current state with the latest message.
    async fn start_run(&self, thread_id: &str, content: &str, username: &str) -> Result<String>;

    /// Poll the status of a run.
    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus>;

    /// Fetch the final transcript. Blocks server-side until available.
    async fn fetch_transcript(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Vec<TranscriptMessage>>;
}
