//! HTTP server for the support agent

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return its render handle.
///
/// Must be called once per process, before any metrics are emitted.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}
