//! Shared types for the query routing pipeline

use serde::{Deserialize, Serialize};

/// Category of a user request, determining which handler answers it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Answer by grounding the generator in retrieved FAQ snippets
    #[serde(rename = "RAG")]
    Rag,
    /// Deterministic order-status lookup
    #[serde(rename = "Order_Status")]
    OrderStatus,
    /// Static product catalog lookup
    #[serde(rename = "Product_Info")]
    ProductInfo,
    /// Router-level fallback label for unrecoverable failure.
    /// Never produced by the classifier.
    #[serde(rename = "General")]
    General,
}

impl Intent {
    /// Wire label, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Rag => "RAG",
            Intent::OrderStatus => "Order_Status",
            Intent::ProductInfo => "Product_Info",
            Intent::General => "General",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier verdict: an intent plus the auxiliary detail extracted with it
///
/// `details` holds an order id or product name when the classifier found
/// one, or a sentinel ("None"/"General"/empty) when extraction failed or
/// the query was not specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    pub details: String,
}

impl Classification {
    /// Fail-open verdict used whenever classification cannot be trusted
    pub fn fallback() -> Self {
        Self {
            intent: Intent::Rag,
            details: String::new(),
        }
    }

    /// True when `details` carries a usable value rather than a sentinel
    pub fn has_detail(&self) -> bool {
        let d = self.details.trim();
        !d.is_empty() && !d.eq_ignore_ascii_case("none") && !d.eq_ignore_ascii_case("general")
    }
}

/// A previously ingested FAQ entry
///
/// Created by the offline ingestion process; read-only at query time.
/// The embedding length must equal the configured index dimension or
/// ingestion fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    /// Unique record id (vector store point id)
    pub id: String,
    /// Source document id (e.g. "returns-policy")
    pub doc_id: String,
    /// FAQ question text
    pub question: String,
    /// FAQ answer text
    pub answer: String,
    /// Embedding vector of fixed dimension D
    #[serde(default)]
    pub embedding: Vec<f32>,
}

/// Scored search result from the knowledge store
#[derive(Debug, Clone)]
pub struct FaqMatch {
    /// Similarity score
    pub score: f32,
    /// Source document id from metadata
    pub doc_id: String,
    /// Original FAQ question
    pub question: String,
    /// FAQ answer text used for grounding
    pub answer: String,
}

/// A grounding snippet derived from one knowledge record
///
/// Ephemeral; built per request by the context selector or the fallback
/// retriever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextChunk {
    /// Source document id, cited inline in answers
    pub doc_id: String,
    /// Snippet text
    pub text: String,
}

impl ContextChunk {
    pub fn new(doc_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            text: text.into(),
        }
    }

    /// Render the chunk with its source marker attached.
    ///
    /// Used both inside grounding instructions and as the literal answer
    /// when the degraded path skips generation, so the citation survives
    /// either way.
    pub fn display(&self) -> String {
        format!("{} (Source: {})", self.text.trim(), self.doc_id)
    }
}

/// A cited source attached to a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

impl Source {
    /// Build a source reference from a knowledge document id
    pub fn from_doc_id(doc_id: &str) -> Self {
        Self {
            uri: format!("kb://{}", doc_id),
            title: humanize_doc_id(doc_id),
        }
    }
}

/// "returns-policy" -> "Returns Policy"
fn humanize_doc_id(doc_id: &str) -> String {
    doc_id
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Final, externally visible artifact of one request cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotResponse {
    /// Conversational answer, never empty
    pub answer: String,
    /// Resolved intent label
    pub intent: Intent,
    /// Cited sources, when the answer is grounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl BotResponse {
    pub fn new(answer: impl Into<String>, intent: Intent) -> Self {
        Self {
            answer: answer.into(),
            intent,
            sources: None,
        }
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        if !sources.is_empty() {
            self.sources = Some(sources);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_wire_labels() {
        assert_eq!(serde_json::to_string(&Intent::Rag).unwrap(), "\"RAG\"");
        assert_eq!(
            serde_json::to_string(&Intent::OrderStatus).unwrap(),
            "\"Order_Status\""
        );
        assert_eq!(
            serde_json::to_string(&Intent::ProductInfo).unwrap(),
            "\"Product_Info\""
        );
        assert_eq!(Intent::General.as_str(), "General");
    }

    #[test]
    fn test_classification_sentinels() {
        let c = Classification {
            intent: Intent::OrderStatus,
            details: "ABC1234".into(),
        };
        assert!(c.has_detail());

        for sentinel in ["None", "none", "General", "", "  "] {
            let c = Classification {
                intent: Intent::OrderStatus,
                details: sentinel.into(),
            };
            assert!(!c.has_detail(), "sentinel {:?} treated as detail", sentinel);
        }
    }

    #[test]
    fn test_fallback_classification() {
        let c = Classification::fallback();
        assert_eq!(c.intent, Intent::Rag);
        assert!(!c.has_detail());
    }

    #[test]
    fn test_chunk_display_carries_source() {
        let chunk = ContextChunk::new("returns-policy", "Items may be returned within 30 days.");
        let rendered = chunk.display();
        assert!(rendered.contains("returns-policy"));
        assert!(rendered.starts_with("Items may be returned"));
    }

    #[test]
    fn test_source_from_doc_id() {
        let source = Source::from_doc_id("returns-policy");
        assert_eq!(source.uri, "kb://returns-policy");
        assert_eq!(source.title, "Returns Policy");
    }

    #[test]
    fn test_bot_response_empty_sources_omitted() {
        let response = BotResponse::new("hello", Intent::Rag).with_sources(vec![]);
        assert!(response.sources.is_none());

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("sources"));
    }
}
