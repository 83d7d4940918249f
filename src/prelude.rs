//! Convenience re-exports for common use.

pub use crate::client::{AgentService, HttpAgentService};
pub use crate::config::GangwayConfig;
pub use crate::error::{AdapterError, Result};
pub use crate::normalize::{normalize, AnswerPayload, Citation, NormalizedResult};
pub use crate::pipeline::Pipeline;
pub use crate::progress::{ProgressText, WaitingQuotes};
pub use crate::store::{ConversationId, ConversationState, ConversationStore};
pub use crate::types::{
    ChatMessage, CitationEvent, OutputChunk, Role, RunHandle, RunOutcome, RunStatus,
};
