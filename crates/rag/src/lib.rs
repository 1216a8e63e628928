//! Retrieval layer for the support agent
//!
//! Features:
//! - Gemini embeddings with permanent quota degradation (synthetic vectors)
//! - Dense vector search via Qdrant
//! - Context selection with pluggable ranking adjustment
//! - Local fallback retriever for when vector search is unavailable
//! - Knowledge base ingestion

pub mod context;
pub mod embeddings;
pub mod fallback;
pub mod ingest;
pub mod vector_store;

pub use context::{ContextSelector, KeywordBoost, KeywordRule, NoBoost, RankingAdjustment};
pub use embeddings::{GeminiEmbedder, GeminiEmbeddingConfig};
pub use fallback::{FallbackRetriever, FALLBACK_DOC_ID};
pub use ingest::{KnowledgeFile, KnowledgeLoader};
pub use vector_store::{VectorStore, VectorStoreConfig};

use thiserror::Error;

/// RAG errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Ingestion error: {0}")]
    Ingestion(String),
}

impl From<RagError> for support_agent_core::Error {
    fn from(err: RagError) -> Self {
        use support_agent_core::Error;
        match err {
            RagError::Embedding(msg) => Error::Embedding(msg),
            RagError::VectorStore(msg) | RagError::Connection(msg) => Error::VectorStore(msg),
            RagError::Search(msg) => Error::Search(msg),
            RagError::Dimension { expected, actual } => Error::Ingestion(format!(
                "vector dimension mismatch: expected {}, got {}",
                expected, actual
            )),
            RagError::Ingestion(msg) => Error::Ingestion(msg),
        }
    }
}
