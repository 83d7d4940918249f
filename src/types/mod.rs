//! Core types shared across the adapter.

pub mod chunk;
pub mod message;
pub mod run;

pub use chunk::{CitationEvent, CitationSource, OutputChunk, SourceMetadata};
pub use message::{ChatMessage, Role, TranscriptMessage};
pub use run::{RunHandle, RunOutcome, RunStatus};
