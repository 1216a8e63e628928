//! Knowledge store trait

use async_trait::async_trait;

use crate::{FaqMatch, Result};

/// Nearest-neighbor search over pre-ingested FAQ vectors
///
/// Implementations:
/// - `VectorStore` - Qdrant-backed store (support-agent-rag)
#[async_trait]
pub trait KnowledgeSearch: Send + Sync + 'static {
    /// Return the `top_k` closest records with their metadata, ranked by
    /// similarity (highest first). An empty result is not an error.
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<FaqMatch>>;
}
