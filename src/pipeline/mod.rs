//! Per-turn coordination: reconcile, run, normalize, stream.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::debug;

use crate::client::{AgentService, HttpAgentService};
use crate::config::GangwayConfig;
use crate::error::{AdapterError, Result};
use crate::normalize::normalize;
use crate::progress::{ProgressText, WaitingQuotes};
use crate::reconcile::StateReconciler;
use crate::run::{RunEvent, RunPoller};
use crate::store::{ConversationId, ConversationStore};
use crate::types::{ChatMessage, CitationEvent, OutputChunk, RunHandle, RunOutcome};

/// Opens the narration section of the output stream.
pub const THINKING_OPEN: &str = "<thinking>";
/// Closes the narration section; text after it is answer content.
pub const THINKING_CLOSE: &str = "</thinking>";

/// Top-level adapter: one instance serves many conversations.
pub struct Pipeline {
    config: GangwayConfig,
    service: Arc<dyn AgentService>,
    store: ConversationStore,
    reconciler: Arc<StateReconciler>,
    poller: RunPoller,
    progress: Arc<dyn ProgressText>,
}

impl Pipeline {
    /// Build a pipeline talking HTTP to the configured service.
    pub fn new(config: GangwayConfig) -> Result<Self> {
        let service: Arc<dyn AgentService> = Arc::new(HttpAgentService::new(&config)?);
        Ok(Self::with_service(config, service))
    }

    /// Build a pipeline over an injected service implementation.
    pub fn with_service(config: GangwayConfig, service: Arc<dyn AgentService>) -> Self {
        let poller = RunPoller {
            budget: config.run_budget,
            poll_interval: config.poll_interval,
            liveness_interval: config.liveness_interval,
        };
        Self {
            reconciler: Arc::new(StateReconciler::new(Arc::clone(&service))),
            service,
            store: ConversationStore::new(),
            poller,
            progress: Arc::new(WaitingQuotes::new()),
            config,
        }
    }

    /// Replace the waiting-text strategy.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressText>) -> Self {
        self.progress = progress;
        self
    }

    /// Protocol/version tag surfaced to the host application.
    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// The conversation store, for observability.
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Execute one chat turn.
    ///
    /// Returns a lazy, finite, non-restartable stream of output chunks:
    /// progress narration inside a thinking block, then the answer text and
    /// zero or more citation events. Dropping the stream stops all remote
    /// calls; in-flight requests are allowed to complete.
    pub fn turn(
        &self,
        messages: Vec<ChatMessage>,
        username: Option<String>,
    ) -> BoxStream<'static, OutputChunk> {
        let service = Arc::clone(&self.service);
        let reconciler = Arc::clone(&self.reconciler);
        let progress = Arc::clone(&self.progress);
        let store = self.store.clone();
        let poller = self.poller.clone();
        let budget_secs = self.config.run_budget.as_secs();

        let stream = async_stream::stream! {
            yield OutputChunk::text(THINKING_OPEN);

            if messages.is_empty() {
                yield OutputChunk::text(format!(
                    "{THINKING_CLOSE}\n\nError: No messages provided"
                ));
                return;
            }

            yield OutputChunk::text(format!("\n{}", progress.waiting_line()));

            let conversation = ConversationId::derive(&messages);
            debug!(%conversation, messages = messages.len(), "turn started");

            // Lock this conversation for the whole turn; other
            // conversations proceed independently.
            let cell = store.get_or_init(&conversation);
            let mut state = cell.lock_owned().await;
            let message_count = messages.len();

            if StateReconciler::needs_new_thread(&state, message_count) {
                yield OutputChunk::text("\n🔄 Setting up new conversation...");
                if let Err(e) = reconciler.provision_thread(&mut state).await {
                    yield OutputChunk::text(format!(
                        "{THINKING_CLOSE}\n\n{}",
                        e.user_message()
                    ));
                    return;
                }
            }

            if StateReconciler::needs_replay(&state, message_count) {
                yield OutputChunk::text("\n🔄 Updating conversation state...");
                reconciler.replay(&mut state, &messages).await;
            }

            StateReconciler::commit_cursor(&mut state, message_count);

            let thread_id = state
                .thread_id
                .clone()
                .expect("thread provisioned above");
            let latest = messages
                .last()
                .expect("non-empty checked above")
                .content
                .clone();
            let username = username.unwrap_or_else(|| "unknown".to_string());

            let run_id = match service.start_run(&thread_id, &latest, &username).await {
                Ok(run_id) => run_id,
                Err(e) => {
                    yield OutputChunk::text(format!(
                        "{THINKING_CLOSE}\n\n{}",
                        e.user_message()
                    ));
                    return;
                }
            };

            yield OutputChunk::text("\n🔄 Processing your request...");

            let handle = RunHandle {
                thread_id: thread_id.clone(),
                run_id: run_id.clone(),
            };
            let mut events = poller.poll(
                Arc::clone(&service),
                handle,
                Arc::clone(&progress),
            );
            let mut outcome = None;
            while let Some(event) = events.next().await {
                match event {
                    RunEvent::Liveness(line) => {
                        yield OutputChunk::text(format!("\n{line}"));
                    }
                    RunEvent::Outcome(o) => {
                        outcome = Some(o);
                        break;
                    }
                }
            }

            match outcome {
                Some(RunOutcome::ResultReady) => {
                    yield OutputChunk::text("\n✅ Generating response...");
                }
                Some(RunOutcome::Failed(status)) => {
                    yield OutputChunk::text(format!(
                        "{THINKING_CLOSE}\n\n{}",
                        AdapterError::RunFailed(status).user_message()
                    ));
                    return;
                }
                // The poll stream always ends with an outcome; a vanished
                // stream is treated as budget exhaustion.
                Some(RunOutcome::BudgetExceeded) | None => {
                    yield OutputChunk::text(format!(
                        "{THINKING_CLOSE}\n\n{}",
                        AdapterError::BudgetExceeded { secs: budget_secs }.user_message()
                    ));
                    return;
                }
            }

            yield OutputChunk::text("\n📥 Retrieving response...");

            let transcript = match service.fetch_transcript(&thread_id, &run_id).await {
                Ok(transcript) => transcript,
                Err(e) => {
                    yield OutputChunk::text(format!(
                        "{THINKING_CLOSE}\n\n{}",
                        e.user_message()
                    ));
                    return;
                }
            };

            yield OutputChunk::text(THINKING_CLOSE);

            let last = match transcript.last() {
                Some(last) => last,
                None => {
                    let e = AdapterError::EmptyResponse(
                        "No response received from assistant".to_string(),
                    );
                    yield OutputChunk::text(format!("\n\n{}", e.user_message()));
                    return;
                }
            };
            if last.is_empty() {
                let e = AdapterError::EmptyResponse("Assistant response is empty".to_string());
                yield OutputChunk::text(format!("\n\n{}", e.user_message()));
                return;
            }

            let result = normalize(&last.content);
            yield OutputChunk::text(format!("\n\n{}", result.answer));
            for citation in &result.citations {
                yield OutputChunk::Citation(CitationEvent::new(
                    &citation.quote,
                    &citation.source_label,
                    &citation.source_url,
                ));
            }

            StateReconciler::commit_cursor(&mut state, message_count);
            debug!(%conversation, "turn completed");
        };

        Box::pin(stream)
    }
}
