//! Generation backend for the support agent
//!
//! Features:
//! - Gemini generateContent backend (free text + strict-schema JSON)
//! - Grounding and classification prompt builders

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiBackend, GeminiConfig, GeminiModel};
pub use prompt::{classification_instruction, classification_schema, grounding_instruction};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for support_agent_core::Error {
    fn from(err: LlmError) -> Self {
        support_agent_core::Error::Generation(err.to_string())
    }
}
