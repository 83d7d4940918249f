//! Message types for conversation histories and transcripts.

use serde::{Deserialize, Serialize};

/// A message in the caller-supplied conversation history.
///
/// Ordering matters: the remote thread expects append-only history
/// semantics and the adapter never reorders messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

impl Role {
    /// The logical graph node a state delta for this role is attributed to.
    /// The remote state machine rejects patches with any other routing.
    pub fn as_node(self) -> &'static str {
        match self {
            Role::User => "__start__",
            _ => "generate",
        }
    }
}

/// A message from a fetched run transcript.
///
/// The service does not guarantee string content, so it is kept as a raw
/// JSON value until normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptMessage {
    #[serde(default)]
    pub content: serde_json::Value,
}

impl TranscriptMessage {
    /// Whether the content is missing or empty.
    pub fn is_empty(&self) -> bool {
        match &self.content {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}
