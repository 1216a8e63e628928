//! Configuration for the support agent
//!
//! Settings are layered: built-in defaults, then `config/default.yaml`
//! (and `config/{env}.yaml` when an environment name is given), then
//! environment variables prefixed `SUPPORT_AGENT__`.

mod settings;

pub use settings::{
    load_settings, EmbeddingConfig, GenerationConfig, ObservabilityConfig, RetrievalConfig,
    RuntimeEnvironment, ServerConfig, Settings, VectorStoreConfig,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
