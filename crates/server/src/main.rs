//! Support Agent Server Entry Point

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use support_agent_agent::{IntentClassifier, QueryRouter, RagPipeline};
use support_agent_config::{load_settings, Settings};
use support_agent_core::ResponseGenerator;
use support_agent_llm::{GeminiBackend, GeminiConfig};
use support_agent_rag::{
    ContextSelector, GeminiEmbedder, GeminiEmbeddingConfig, KeywordBoost, NoBoost,
    RankingAdjustment, VectorStore, VectorStoreConfig,
};
use support_agent_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("SUPPORT_AGENT_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };

    init_tracing(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        "Starting support agent server"
    );

    let metrics_handle = init_metrics();

    let generator: Arc<dyn ResponseGenerator> =
        Arc::new(GeminiBackend::new(GeminiConfig::from(&config.generation))?);
    tracing::info!(model = generator.model_name(), "Generation backend ready");

    let embedder = Arc::new(GeminiEmbedder::new(GeminiEmbeddingConfig::from(
        &config.embedding,
    ))?);

    let store = Arc::new(VectorStore::new(VectorStoreConfig {
        endpoint: config.vector_store.endpoint.clone(),
        collection: config.vector_store.collection.clone(),
        vector_dim: config.embedding.dim,
        api_key: config.vector_store.api_key.clone(),
    })?);

    // A missing collection is not fatal: queries degrade to the local
    // fallback until ingestion has run
    if let Err(e) = store.ensure_collection().await {
        tracing::warn!(
            error = %e,
            "Vector store unavailable at startup; RAG queries will use fallback context"
        );
    }

    let adjustment: Arc<dyn RankingAdjustment> = if config.retrieval.keyword_boost_enabled {
        Arc::new(KeywordBoost::default())
    } else {
        Arc::new(NoBoost)
    };
    let selector = ContextSelector::new(config.retrieval.max_context_chunks, adjustment);

    let rag = RagPipeline::new(
        embedder.clone(),
        store.clone(),
        generator.clone(),
        selector,
        config.retrieval.top_k,
    );
    let router = Arc::new(QueryRouter::new(IntentClassifier::new(generator), rag));

    let port = config.server.port;
    let state = AppState::new(Arc::new(config), router, store, embedder, metrics_handle);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Initialize tracing with env-filter and optional JSON output
fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "support_agent={},tower_http=debug",
            config.observability.log_level
        )
        .into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
