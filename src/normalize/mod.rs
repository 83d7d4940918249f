//! Normalizes the final transcript entry into an answer plus citations.

use serde::Deserialize;
use serde_json::Value;

/// Structured answer fields recognized in transcript content.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StructuredAnswer {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub citations: Vec<RawCitation>,
}

/// A citation as the agent emits it, before normalization.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawCitation {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Parsed transcript content: either a recognized structured answer or the
/// raw content verbatim. Malformed content is never an error, only `Raw`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerPayload {
    Structured { raw: String, answer: StructuredAnswer },
    Raw(String),
}

impl AnswerPayload {
    /// Parse transcript content.
    ///
    /// String content that holds a JSON object is attempted as structured;
    /// any other string is raw. Non-string content is rendered verbatim as
    /// raw text.
    pub fn parse(content: &Value) -> Self {
        let text = match content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if let Value::String(s) = content {
            if let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(s) {
                if let Ok(answer) = serde_json::from_value::<StructuredAnswer>(parsed) {
                    return Self::Structured { raw: text, answer };
                }
            }
        }
        Self::Raw(text)
    }
}

/// A display-ready citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub quote: String,
    pub source_label: String,
    pub source_url: String,
}

/// Normalized result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResult {
    pub answer: String,
    pub citations: Vec<Citation>,
}

const UNKNOWN_SOURCE: &str = "Unknown Source";
const PLACEHOLDER_URL: &str = "#";

/// Normalize transcript content into an answer and citation records.
///
/// Citations without quoted text carry no actionable reference and are
/// dropped; missing source labels and URLs get placeholders. When the
/// structured `answer` field is absent the raw content stands in for it.
pub fn normalize(content: &Value) -> NormalizedResult {
    match AnswerPayload::parse(content) {
        AnswerPayload::Structured { raw, answer } => {
            let citations = answer
                .citations
                .into_iter()
                .filter_map(|c| {
                    let quote = c.quote.filter(|q| !q.is_empty())?;
                    Some(Citation {
                        quote: quote.trim().to_string(),
                        source_label: c
                            .source
                            .filter(|s| !s.is_empty())
                            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
                        source_url: c
                            .file_url
                            .filter(|u| !u.is_empty())
                            .unwrap_or_else(|| PLACEHOLDER_URL.to_string()),
                    })
                })
                .collect();
            NormalizedResult {
                answer: answer.answer.unwrap_or(raw),
                citations,
            }
        }
        AnswerPayload::Raw(text) => NormalizedResult {
            answer: text,
            citations: Vec::new(),
        },
    }
}
