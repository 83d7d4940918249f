//! Output stream chunks delivered to the host application.

use serde::Serialize;

/// One chunk of the per-turn output stream.
///
/// Text chunks carry progress narration, the thinking markers, the final
/// answer, and error text. Everything emitted before the closing thinking
/// marker is narration, not answer content.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum OutputChunk {
    Text(String),
    Citation(CitationEvent),
}

impl OutputChunk {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The text content, if this is a text chunk.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Citation(_) => None,
        }
    }
}

/// A structured citation event, serialized in the host's wire shape.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CitationEvent {
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub data: CitationData,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CitationData {
    pub document: Vec<String>,
    pub metadata: Vec<SourceMetadata>,
    pub source: CitationSource,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceMetadata {
    pub source: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CitationSource {
    pub name: String,
    pub url: String,
}

impl CitationEvent {
    pub fn new(quote: &str, source: &str, url: &str) -> Self {
        Self {
            event_type: "citation",
            data: CitationData {
                document: vec![quote.trim().to_string()],
                metadata: vec![SourceMetadata {
                    source: source.to_string(),
                }],
                source: CitationSource {
                    name: source.to_string(),
                    url: url.to_string(),
                },
            },
        }
    }
}
