//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Text embedding interface
///
/// Implementations:
/// - `GeminiEmbedder` - remote embedding API with permanent quota
///   degradation (support-agent-rag)
///
/// # Example
///
/// ```ignore
/// let embedder: Arc<dyn Embedder> = Arc::new(GeminiEmbedder::new(config)?);
/// let vector = embedder.embed("What's your return policy?").await?;
/// assert_eq!(vector.len(), embedder.dim());
/// ```
#[async_trait]
pub trait Embedder: Send + Sync + 'static {
    /// Embed a single text into a fixed-dimension vector.
    ///
    /// Must return a vector of exactly `dim()` values. Quota exhaustion is
    /// handled inside the implementation (degraded mode); any other
    /// provider failure propagates.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimension D, fixed for the lifetime of the index
    fn dim(&self) -> usize;

    /// Whether the provider has entered degraded (synthetic vector) mode
    fn is_degraded(&self) -> bool {
        false
    }
}
