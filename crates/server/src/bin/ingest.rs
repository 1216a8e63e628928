//! Knowledge base ingestion entrypoint
//!
//! Embeds the static FAQ set and upserts it into the vector store. Run
//! once before serving (and again whenever the knowledge file changes):
//!
//! ```text
//! cargo run --bin ingest
//! ```

use std::path::Path;
use std::sync::Arc;

use support_agent_config::{load_settings, Settings};
use support_agent_rag::{
    GeminiEmbedder, GeminiEmbeddingConfig, KnowledgeLoader, VectorStore, VectorStoreConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "support_agent=info".into()),
        )
        .init();

    let env = std::env::var("SUPPORT_AGENT_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };

    let embedder = Arc::new(GeminiEmbedder::new(GeminiEmbeddingConfig::from(
        &config.embedding,
    ))?);

    let store = VectorStore::new(VectorStoreConfig {
        endpoint: config.vector_store.endpoint.clone(),
        collection: config.vector_store.collection.clone(),
        vector_dim: config.embedding.dim,
        api_key: config.vector_store.api_key.clone(),
    })?;

    let knowledge_path = Path::new(&config.retrieval.knowledge_path);
    tracing::info!(
        file = %knowledge_path.display(),
        collection = %config.vector_store.collection,
        dim = config.embedding.dim,
        "Starting knowledge base ingestion"
    );

    let count = KnowledgeLoader::ingest(knowledge_path, embedder.as_ref(), &store).await?;

    tracing::info!(records = count, "Ingestion complete");
    Ok(())
}
