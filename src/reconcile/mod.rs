//! Reconciles an edited local message history with remote thread state.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::AgentService;
use crate::error::Result;
use crate::store::ConversationState;
use crate::types::ChatMessage;

/// Decides whether a turn needs a fresh thread or a state replay, and
/// applies the minimal set of remote patches.
///
/// Replay failures are non-fatal: the remote thread's checkpoint chain is
/// append-oriented and partial progress is preserved, so the turn proceeds
/// with the best-known anchor and lets the run itself succeed or fail.
pub struct StateReconciler {
    service: Arc<dyn AgentService>,
}

impl StateReconciler {
    pub fn new(service: Arc<dyn AgentService>) -> Self {
        Self { service }
    }

    /// A fresh thread is needed when none exists yet, or when the incoming
    /// history has exactly one message (a conversation starting over).
    pub fn needs_new_thread(state: &ConversationState, message_count: usize) -> bool {
        state.thread_id.is_none() || message_count == 1
    }

    /// A shrink-or-equal history length signals the caller edited or
    /// regenerated an earlier message rather than appending.
    pub fn needs_replay(state: &ConversationState, message_count: usize) -> bool {
        message_count > 0 && message_count <= state.observed_messages
    }

    /// Create a new remote thread and reset the cursor onto it.
    ///
    /// Failure here aborts the turn: without a thread there is nothing to
    /// run against.
    pub async fn provision_thread(&self, state: &mut ConversationState) -> Result<()> {
        let thread_id = self.service.create_thread().await?;
        debug!(thread_id = %thread_id, "provisioned new thread");
        state.reset_onto(thread_id);
        Ok(())
    }

    /// Replay all messages except the final one into the remote thread as
    /// chained state patches. The final message is deferred to run-start.
    ///
    /// Absorbs every failure: on a patch error, replay stops early and the
    /// last successfully advanced checkpoint is kept.
    pub async fn replay(&self, state: &mut ConversationState, messages: &[ChatMessage]) {
        let Some(thread_id) = state.thread_id.clone() else {
            warn!("replay requested without a thread; skipping");
            return;
        };
        let prior = match messages.split_last() {
            Some((_, prior)) => prior,
            None => return,
        };

        if state.anchor_checkpoint.is_none() {
            match self.service.fetch_history(&thread_id).await {
                Ok(history) => match history.last() {
                    Some(record) => {
                        state.anchor_checkpoint = Some(record.checkpoint_id.clone());
                    }
                    None => {
                        warn!(thread_id = %thread_id, "no history for thread; skipping replay");
                        return;
                    }
                },
                Err(e) => {
                    warn!(thread_id = %thread_id, error = %e, "failed to fetch thread history");
                    return;
                }
            }
        }

        // Anchor is present from here on; each successful patch advances it.
        let mut anchor = state
            .anchor_checkpoint
            .clone()
            .unwrap_or_default();

        for message in prior {
            match self
                .service
                .patch_state(&thread_id, &anchor, message, message.role.as_node())
                .await
            {
                Ok(Some(next)) => {
                    anchor = next;
                    state.anchor_checkpoint = Some(anchor.clone());
                }
                Ok(None) => {
                    // Service accepted the patch but reported no new
                    // checkpoint; keep chaining from the current anchor.
                }
                Err(e) => {
                    warn!(
                        thread_id = %thread_id,
                        error = %e,
                        "state patch failed; stopping replay with partial progress"
                    );
                    break;
                }
            }
        }
    }

    /// Persist the observed message count after reconciliation, whether or
    /// not a replay ran.
    pub fn commit_cursor(state: &mut ConversationState, message_count: usize) {
        state.observed_messages = message_count;
    }
}
