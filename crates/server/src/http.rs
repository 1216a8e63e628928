//! HTTP Endpoints
//!
//! REST API for the support agent.

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/api/query", post(handle_query))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins; permissive when none are
/// configured (development)
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        tracing::warn!("No CORS origins configured; allowing all origins (development only)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Query request body.
///
/// `query` is kept as a raw JSON value so a wrong-typed field produces the
/// same 400 as a missing one instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
struct QueryRequest {
    #[serde(default)]
    query: Option<serde_json::Value>,
}

/// Validated query text, or None for missing/wrong-type/empty input
fn parse_query(request: &QueryRequest) -> Option<&str> {
    let query = request.query.as_ref()?.as_str()?;
    if query.trim().is_empty() {
        return None;
    }
    Some(query)
}

/// Query endpoint
async fn handle_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    let query = match parse_query(&request) {
        Some(query) => query.to_string(),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Query parameter is required."})),
            );
        },
    };

    let response = state.router.route(&query).await;

    (
        StatusCode::OK,
        Json(serde_json::to_value(response)
            .unwrap_or_else(|_| serde_json::json!({"error": "Internal server error."}))),
    )
}

/// Liveness check
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check: verifies vector-store connectivity and reports the
/// embedding adapter's degradation state
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let store_ok = state.store.health().await;

    let status_code = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if store_ok { "ready" } else { "not_ready" },
            "checks": {
                "vector_store": if store_ok { "ok" } else { "unreachable" },
                "embeddings": if state.embedder.is_degraded() { "degraded" } else { "live" },
            }
        })),
    )
}

/// Prometheus metrics
async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}

/// Convert a handler panic into the documented 500 body
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Internal server error."})),
    )
        .into_response()
}
