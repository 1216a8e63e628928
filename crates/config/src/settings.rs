//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation backend configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Vector store configuration
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Retrieval and context-selection configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty means same-origin only
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API key; defaults to the GEMINI_API_KEY environment variable
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Model name
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// API endpoint (override for testing or proxying)
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_output_tokens: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key() -> String {
    std::env::var("GEMINI_API_KEY").unwrap_or_default()
}

fn default_generation_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_generation_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> usize {
    1024
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            model: default_generation_model(),
            endpoint: default_generation_endpoint(),
            temperature: default_temperature(),
            max_output_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// API key; falls back to the generation key when unset
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// API endpoint
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    /// Embedding dimension D, fixed for the lifetime of the index
    #[serde(default = "default_embedding_dim")]
    pub dim: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_embedding_dim() -> usize {
    768
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            model: default_embedding_model(),
            endpoint: default_generation_endpoint(),
            dim: default_embedding_dim(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Qdrant endpoint
    #[serde(default = "default_qdrant_endpoint")]
    pub endpoint: String,
    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,
    /// API key (optional)
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_qdrant_endpoint() -> String {
    "http://localhost:6334".to_string()
}

fn default_collection() -> String {
    "support_faq".to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_qdrant_endpoint(),
            collection: default_collection(),
            api_key: None,
        }
    }
}

/// Retrieval and context-selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of candidates requested from vector search
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Maximum context chunks handed to the generator
    #[serde(default = "default_max_chunks")]
    pub max_context_chunks: usize,
    /// Enable the keyword-based document preference
    #[serde(default = "default_true")]
    pub keyword_boost_enabled: bool,
    /// Path to the knowledge file consumed by the ingest binary
    #[serde(default = "default_knowledge_path")]
    pub knowledge_path: String,
}

fn default_top_k() -> usize {
    8
}

fn default_max_chunks() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_knowledge_path() -> String {
    "knowledge/faq.yaml".to_string()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_context_chunks: default_max_chunks(),
            keyword_boost_enabled: default_true(),
            knowledge_path: default_knowledge_path(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON-formatted logs
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Validate settings at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dim == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embedding.dim".to_string(),
                message: "Embedding dimension must be non-zero".to_string(),
            });
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.top_k".to_string(),
                message: "top_k must be at least 1".to_string(),
            });
        }

        if self.retrieval.max_context_chunks == 0
            || self.retrieval.max_context_chunks > self.retrieval.top_k
        {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.max_context_chunks".to_string(),
                message: format!(
                    "Must be between 1 and top_k ({}), got {}",
                    self.retrieval.top_k, self.retrieval.max_context_chunks
                ),
            });
        }

        if self.environment.is_production() && self.generation.api_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generation.api_key".to_string(),
                message: "API key is required in production (set GEMINI_API_KEY)".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = Path::new("config/default.yaml");
    if default_path.exists() {
        builder = builder.add_source(File::from(default_path));
    }

    if let Some(env_name) = env {
        let env_path_string = format!("config/{}.yaml", env_name);
        let env_path = Path::new(&env_path_string);
        if env_path.exists() {
            builder = builder.add_source(File::from(env_path));
        }
    }

    builder = builder.add_source(Environment::with_prefix("SUPPORT_AGENT").separator("__"));

    let settings: Settings = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.embedding.dim, 768);
        assert_eq!(settings.retrieval.top_k, 8);
        assert_eq!(settings.retrieval.max_context_chunks, 3);
        assert!(settings.retrieval.keyword_boost_enabled);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dim() {
        let mut settings = Settings::default();
        settings.embedding.dim = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_chunks_above_top_k() {
        let mut settings = Settings::default();
        settings.retrieval.top_k = 2;
        settings.retrieval.max_context_chunks = 3;
        assert!(settings.validate().is_err());
    }
}
