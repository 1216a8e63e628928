//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use support_agent_agent::QueryRouter;
use support_agent_config::Settings;
use support_agent_core::Embedder;
use support_agent_rag::VectorStore;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Settings>,
    /// The query router
    pub router: Arc<QueryRouter>,
    /// Vector store handle, kept for readiness probing
    pub store: Arc<VectorStore>,
    /// Embedding adapter, kept for degradation reporting
    pub embedder: Arc<dyn Embedder>,
    /// Prometheus render handle
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        config: Arc<Settings>,
        router: Arc<QueryRouter>,
        store: Arc<VectorStore>,
        embedder: Arc<dyn Embedder>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            config,
            router,
            store,
            embedder,
            metrics,
        }
    }
}
