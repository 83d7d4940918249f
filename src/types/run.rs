//! Run lifecycle types.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Handle to an in-flight remote run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHandle {
    pub thread_id: String,
    pub run_id: String,
}

/// Status reported by the remote service for a run.
///
/// `Unknown` covers transient or unrecognized wire values and is treated as
/// non-terminal: the poll loop keeps going rather than failing the run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Success,
    Error,
    Timeout,
    Interrupted,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Terminal failure states: the run is over and produced no result.
    pub fn is_terminal_failure(self) -> bool {
        matches!(self, Self::Error | Self::Timeout | Self::Interrupted)
    }
}

/// How one run ended, from the orchestrator's point of view.
///
/// `BudgetExceeded` is synthesized locally when the polling time budget
/// elapses; the remote service never reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    ResultReady,
    Failed(RunStatus),
    BudgetExceeded,
}
