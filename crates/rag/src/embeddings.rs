//! Gemini Embeddings
//!
//! Turns text into fixed-dimension vectors via the Gemini embedContent API.
//!
//! ## Degraded mode
//!
//! The first quota-exhaustion signal (HTTP 429 or a RESOURCE_EXHAUSTED
//! body) switches the adapter to degraded mode for the rest of the
//! process: the triggering call and every later call return a freshly
//! randomized vector of the configured dimension instead of contacting the
//! provider. The quota window only resets on process restart, so the
//! transition is one-way. Any other provider failure propagates unchanged.

use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use support_agent_core::{Embedder, Error, Result};

use crate::RagError;

/// Gemini embedding configuration
#[derive(Debug, Clone)]
pub struct GeminiEmbeddingConfig {
    /// API key
    pub api_key: String,
    /// API endpoint
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// Embedding dimension D
    pub dim: usize,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for GeminiEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "text-embedding-004".to_string(),
            dim: 768,
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&support_agent_config::EmbeddingConfig> for GeminiEmbeddingConfig {
    fn from(config: &support_agent_config::EmbeddingConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            dim: config.dim,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Request to the embedContent API
#[derive(Debug, Serialize)]
struct EmbedRequest {
    content: EmbedContent,
}

#[derive(Debug, Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(Debug, Serialize)]
struct EmbedPart {
    text: String,
}

/// Response from the embedContent API
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbedValues,
}

#[derive(Debug, Deserialize)]
struct EmbedValues {
    values: Vec<f32>,
}

/// Gemini embedder with permanent quota degradation
///
/// The degradation flag is a field on the instance, not a global: tests
/// and independent pipelines construct their own adapters.
pub struct GeminiEmbedder {
    client: Client,
    config: GeminiEmbeddingConfig,
    degraded: AtomicBool,
}

impl GeminiEmbedder {
    /// Create a new embedder in Live mode
    pub fn new(config: GeminiEmbeddingConfig) -> std::result::Result<Self, RagError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RagError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            config,
            degraded: AtomicBool::new(false),
        })
    }

    /// Whether a provider response signals quota exhaustion
    fn is_quota_signal(status: reqwest::StatusCode, body: &str) -> bool {
        status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || body.contains("RESOURCE_EXHAUSTED")
            || body.to_lowercase().contains("quota")
    }

    /// Enter degraded mode. Idempotent; concurrent callers race harmlessly.
    fn mark_degraded(&self) {
        if !self.degraded.swap(true, Ordering::SeqCst) {
            tracing::warn!(
                model = %self.config.model,
                dim = self.config.dim,
                "Embedding quota exhausted; switching to synthetic vectors for the rest of the process"
            );
        }
    }

    /// Freshly randomized vector of dimension D, one value per dimension
    fn synthetic_vector(&self) -> Vec<f32> {
        let mut rng = rand::thread_rng();
        (0..self.config.dim).map(|_| rng.gen::<f32>()).collect()
    }

    async fn embed_remote(&self, text: &str) -> std::result::Result<Vec<f32>, RagError> {
        let request = EmbedRequest {
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: text.to_string(),
                }],
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:embedContent",
            self.config.endpoint, self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("Embedding request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if Self::is_quota_signal(status, &body) {
                self.mark_degraded();
                return Ok(self.synthetic_vector());
            }
            return Err(RagError::Embedding(format!(
                "Embedding failed: HTTP {}: {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to parse embedding: {}", e)))?;

        let values = embed_response.embedding.values;
        if values.len() != self.config.dim {
            return Err(RagError::Dimension {
                expected: self.config.dim,
                actual: values.len(),
            });
        }

        Ok(values)
    }

    /// Test hook: force degraded mode without a provider round-trip
    #[doc(hidden)]
    pub fn force_degraded(&self) {
        self.mark_degraded();
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.degraded.load(Ordering::SeqCst) {
            return Ok(self.synthetic_vector());
        }

        self.embed_remote(text).await.map_err(Error::from)
    }

    fn dim(&self) -> usize {
        self.config.dim
    }

    fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }
}
