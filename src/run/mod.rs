//! Polls a started run to a terminal state within a time budget.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::BoxStream;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::client::AgentService;
use crate::progress::ProgressText;
use crate::types::{RunHandle, RunOutcome, RunStatus};

/// An event from the poll loop.
///
/// Liveness lines are interleaved progress feedback; the stream ends with
/// exactly one `Outcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Liveness(String),
    Outcome(RunOutcome),
}

/// Poll loop configuration.
#[derive(Debug, Clone)]
pub struct RunPoller {
    /// Overall wall-clock budget; once elapsed the run terminates locally
    /// as `BudgetExceeded` with no further polling.
    pub budget: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Minimum cadence of decorative liveness lines while non-terminal.
    pub liveness_interval: Duration,
}

impl Default for RunPoller {
    fn default() -> Self {
        Self {
            budget: Duration::from_secs(120),
            poll_interval: Duration::from_secs(2),
            liveness_interval: Duration::from_secs(8),
        }
    }
}

impl RunPoller {
    /// Drive a run to completion or failure.
    ///
    /// Per-poll transport/service errors are transient: they surface as a
    /// retry liveness line and the loop continues on its cadence, bounded
    /// only by the budget. Dropping the returned stream stops all polling.
    pub fn poll(
        &self,
        service: Arc<dyn AgentService>,
        handle: RunHandle,
        progress: Arc<dyn ProgressText>,
    ) -> BoxStream<'static, RunEvent> {
        let budget = self.budget;
        let poll_interval = self.poll_interval;
        let liveness_interval = self.liveness_interval;

        let stream = async_stream::stream! {
            let started = Instant::now();
            let mut last_liveness = Instant::now();

            loop {
                if started.elapsed() > budget {
                    yield RunEvent::Outcome(RunOutcome::BudgetExceeded);
                    return;
                }

                match service.run_status(&handle.thread_id, &handle.run_id).await {
                    Ok(RunStatus::Success) => {
                        debug!(run_id = %handle.run_id, "run completed");
                        yield RunEvent::Outcome(RunOutcome::ResultReady);
                        return;
                    }
                    Ok(status) if status.is_terminal_failure() => {
                        warn!(run_id = %handle.run_id, %status, "run failed");
                        yield RunEvent::Outcome(RunOutcome::Failed(status));
                        return;
                    }
                    Ok(status) => {
                        debug!(run_id = %handle.run_id, %status, "run still in flight");
                    }
                    Err(e) => {
                        warn!(run_id = %handle.run_id, error = %e, "poll failed; retrying");
                        yield RunEvent::Liveness(
                            "⚠️ Connection hiccup, retrying...".to_string(),
                        );
                    }
                }

                if last_liveness.elapsed() >= liveness_interval {
                    yield RunEvent::Liveness(format!("⏳ {}", progress.waiting_line()));
                    last_liveness = Instant::now();
                }

                tokio::time::sleep(poll_interval).await;
            }
        };

        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::StreamExt;

    use crate::client::CheckpointRecord;
    use crate::error::{AdapterError, Result};
    use crate::types::{ChatMessage, TranscriptMessage};

    struct StatusScript {
        script: Mutex<Vec<Result<RunStatus>>>,
        polls: AtomicUsize,
    }

    impl StatusScript {
        fn new(script: Vec<Result<RunStatus>>) -> Self {
            Self {
                script: Mutex::new(script),
                polls: AtomicUsize::new(0),
            }
        }

        fn poll_count(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AgentService for StatusScript {
        async fn create_thread(&self) -> Result<String> {
            unimplemented!("not used in poller tests")
        }

        async fn fetch_history(&self, _: &str) -> Result<Vec<CheckpointRecord>> {
            unimplemented!("not used in poller tests")
        }

        async fn patch_state(
            &self,
            _: &str,
            _: &str,
            _: &ChatMessage,
            _: &str,
        ) -> Result<Option<String>> {
            unimplemented!("not used in poller tests")
        }

        async fn start_run(&self, _: &str, _: &str, _: &str) -> Result<String> {
            unimplemented!("not used in poller tests")
        }

        async fn run_status(&self, _: &str, _: &str) -> Result<RunStatus> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Ok(RunStatus::Pending)
            } else {
                script.remove(0)
            }
        }

        async fn fetch_transcript(&self, _: &str, _: &str) -> Result<Vec<TranscriptMessage>> {
            unimplemented!("not used in poller tests")
        }
    }

    struct FixedLine;

    impl ProgressText for FixedLine {
        fn waiting_line(&self) -> String {
            "still thinking".to_string()
        }
    }

    fn handle() -> RunHandle {
        RunHandle {
            thread_id: "thread-1".to_string(),
            run_id: "run-1".to_string(),
        }
    }

    fn poller() -> RunPoller {
        RunPoller {
            budget: Duration::from_secs(120),
            poll_interval: Duration::from_secs(2),
            liveness_interval: Duration::from_secs(8),
        }
    }

    async fn collect(stream: BoxStream<'static, RunEvent>) -> Vec<RunEvent> {
        stream.collect().await
    }

    #[tokio::test(start_paused = true)]
    async fn pending_then_success_yields_result_ready() {
        let service = Arc::new(StatusScript::new(vec![
            Ok(RunStatus::Pending),
            Ok(RunStatus::Pending),
            Ok(RunStatus::Success),
        ]));
        let events = collect(poller().poll(
            Arc::clone(&service) as Arc<dyn AgentService>,
            handle(),
            Arc::new(FixedLine),
        ))
        .await;

        assert_eq!(
            events.last(),
            Some(&RunEvent::Outcome(RunOutcome::ResultReady))
        );
        assert_eq!(service.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_failure_ends_the_stream() {
        let service = Arc::new(StatusScript::new(vec![
            Ok(RunStatus::Pending),
            Ok(RunStatus::Interrupted),
        ]));
        let events = collect(poller().poll(
            Arc::clone(&service) as Arc<dyn AgentService>,
            handle(),
            Arc::new(FixedLine),
        ))
        .await;

        assert_eq!(
            events.last(),
            Some(&RunEvent::Outcome(RunOutcome::Failed(
                RunStatus::Interrupted
            )))
        );
        assert_eq!(service.poll_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_status_keeps_polling() {
        let service = Arc::new(StatusScript::new(vec![
            Ok(RunStatus::Unknown),
            Ok(RunStatus::Unknown),
            Ok(RunStatus::Success),
        ]));
        let events = collect(poller().poll(
            Arc::clone(&service) as Arc<dyn AgentService>,
            handle(),
            Arc::new(FixedLine),
        ))
        .await;

        assert_eq!(
            events.last(),
            Some(&RunEvent::Outcome(RunOutcome::ResultReady))
        );
        assert_eq!(service.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_stops_polling() {
        // Always pending: the only way out is the budget.
        let service = Arc::new(StatusScript::new(vec![]));
        let events = collect(poller().poll(
            Arc::clone(&service) as Arc<dyn AgentService>,
            handle(),
            Arc::new(FixedLine),
        ))
        .await;

        assert_eq!(
            events.last(),
            Some(&RunEvent::Outcome(RunOutcome::BudgetExceeded))
        );
        // 120s budget / 2s interval: the poll at t=120 still runs
        // (elapsed == budget), the one after does not.
        assert_eq!(service.poll_count(), 61);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_poll_errors_are_retried_not_fatal() {
        let service = Arc::new(StatusScript::new(vec![
            Err(AdapterError::api(503, "unavailable")),
            Err(AdapterError::api(503, "unavailable")),
            Ok(RunStatus::Success),
        ]));
        let events = collect(poller().poll(
            Arc::clone(&service) as Arc<dyn AgentService>,
            handle(),
            Arc::new(FixedLine),
        ))
        .await;

        let retries = events
            .iter()
            .filter(|e| matches!(e, RunEvent::Liveness(line) if line.contains("retrying")))
            .count();
        assert_eq!(retries, 2);
        assert_eq!(
            events.last(),
            Some(&RunEvent::Outcome(RunOutcome::ResultReady))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn liveness_lines_emitted_on_interval_during_long_waits() {
        let mut script: Vec<Result<RunStatus>> = (0..10).map(|_| Ok(RunStatus::Pending)).collect();
        script.push(Ok(RunStatus::Success));
        let service = Arc::new(StatusScript::new(script));
        let events = collect(poller().poll(
            Arc::clone(&service) as Arc<dyn AgentService>,
            handle(),
            Arc::new(FixedLine),
        ))
        .await;

        // 10 pending polls at 2s each: liveness at t=8 and t=16.
        let liveness = events
            .iter()
            .filter(|e| matches!(e, RunEvent::Liveness(line) if line.contains("still thinking")))
            .count();
        assert_eq!(liveness, 2);
    }
}
