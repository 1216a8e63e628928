//! Gemini Backend
//!
//! Implements the Gemini generateContent API in two modes:
//! - free-text generation for grounded answers
//! - strict-schema JSON output (responseMimeType + responseSchema) for
//!   intent classification

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use support_agent_core::{Error, ResponseGenerator, Result};

use crate::LlmError;

/// Gemini model variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiModel {
    /// Fast default for routing and answering
    Flash2_0,
    /// Previous-generation fast model
    Flash1_5,
    /// Larger model for complex answers
    Pro1_5,
}

impl GeminiModel {
    pub fn model_id(&self) -> &'static str {
        match self {
            GeminiModel::Flash2_0 => "gemini-2.0-flash",
            GeminiModel::Flash1_5 => "gemini-1.5-flash",
            GeminiModel::Pro1_5 => "gemini-1.5-pro",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flash" | "gemini-2.0-flash" => Some(GeminiModel::Flash2_0),
            "gemini-1.5-flash" => Some(GeminiModel::Flash1_5),
            "pro" | "gemini-1.5-pro" => Some(GeminiModel::Pro1_5),
            _ => None,
        }
    }
}

impl Default for GeminiModel {
    fn default() -> Self {
        GeminiModel::Flash2_0
    }
}

/// Configuration for the Gemini backend
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (from GEMINI_API_KEY or direct)
    pub api_key: String,
    /// Model to use
    pub model: GeminiModel,
    /// Maximum tokens to generate
    pub max_output_tokens: usize,
    /// Temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
    /// API endpoint (for testing or proxy)
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: GeminiModel::Flash2_0,
            max_output_tokens: 1024,
            temperature: 0.4,
            timeout: Duration::from_secs(30),
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl GeminiConfig {
    /// Create config with API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set model
    pub fn with_model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set max output tokens
    pub fn with_max_output_tokens(mut self, max_output_tokens: usize) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

impl From<&support_agent_config::GenerationConfig> for GeminiConfig {
    fn from(config: &support_agent_config::GenerationConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: GeminiModel::from_str(&config.model).unwrap_or_default(),
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
            endpoint: config.endpoint.clone(),
        }
    }
}

/// Gemini generateContent backend
pub struct GeminiBackend {
    config: GeminiConfig,
    client: Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(config: GeminiConfig) -> std::result::Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::Configuration(
                "GEMINI_API_KEY not set. Set it via environment or config.".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn generate_content(
        &self,
        system_instruction: Option<&str>,
        user_message: &str,
        response_schema: Option<serde_json::Value>,
    ) -> std::result::Result<String, LlmError> {
        let structured = response_schema.is_some();
        let request = GeminiRequest {
            system_instruction: system_instruction.map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: text.to_string(),
                }],
            }),
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: user_message.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: Some(self.config.temperature),
                max_output_tokens: Some(self.config.max_output_tokens),
                response_mime_type: structured.then(|| "application/json".to_string()),
                response_schema,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint,
            self.config.model.model_id()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(response.text())
    }
}

#[async_trait]
impl ResponseGenerator for GeminiBackend {
    async fn generate(
        &self,
        system_instruction: Option<&str>,
        user_message: &str,
    ) -> Result<String> {
        let text = self
            .generate_content(system_instruction, user_message, None)
            .await
            .map_err(Error::from)?;

        tracing::debug!(
            model = self.config.model.model_id(),
            chars = text.len(),
            "Generated completion"
        );

        Ok(text)
    }

    async fn generate_structured(
        &self,
        system_instruction: &str,
        user_message: &str,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let text = self
            .generate_content(Some(system_instruction), user_message, Some(schema))
            .await
            .map_err(Error::from)?;

        serde_json::from_str(&text).map_err(|e| {
            Error::Generation(format!("Structured output is not valid JSON: {}", e))
        })
    }

    fn model_name(&self) -> &str {
        self.config.model.model_id()
    }
}

// =============================================================================
// Gemini API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate; empty when none
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id() {
        assert_eq!(GeminiModel::Flash2_0.model_id(), "gemini-2.0-flash");
        assert_eq!(GeminiModel::Pro1_5.model_id(), "gemini-1.5-pro");
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!(GeminiModel::from_str("flash"), Some(GeminiModel::Flash2_0));
        assert_eq!(
            GeminiModel::from_str("gemini-1.5-pro"),
            Some(GeminiModel::Pro1_5)
        );
        assert_eq!(GeminiModel::from_str("unknown"), None);
    }

    #[test]
    fn test_config_builder() {
        let config = GeminiConfig::new("test-key")
            .with_model(GeminiModel::Pro1_5)
            .with_temperature(0.2)
            .with_max_output_tokens(512);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, GeminiModel::Pro1_5);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_output_tokens, 512);
    }

    #[test]
    fn test_backend_requires_api_key() {
        let config = GeminiConfig {
            api_key: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            GeminiBackend::new(config),
            Err(LlmError::Configuration(_))
        ));
    }

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest {
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: "You are a support assistant".to_string(),
                }],
            }),
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: "Hello".to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: Some(0.4),
                max_output_tokens: Some(1024),
                response_mime_type: None,
                response_schema: None,
            },
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("systemInstruction"));
        assert!(json.contains("maxOutputTokens"));
        assert!(json.contains("Hello"));
        assert!(!json.contains("responseSchema"));
    }

    #[test]
    fn test_structured_request_serialization() {
        let request = GeminiRequest {
            system_instruction: None,
            contents: vec![],
            generation_config: GeminiGenerationConfig {
                temperature: None,
                max_output_tokens: None,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(serde_json::json!({"type": "object"})),
            },
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("responseMimeType"));
        assert!(json.contains("application/json"));
        assert!(json.contains("responseSchema"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "candidates": [
                {
                    "content": {"role": "model", "parts": [{"text": "Hi there!"}]},
                    "finishReason": "STOP"
                }
            ]
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "Hi there!");
    }

    #[test]
    fn test_empty_response_parsing() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }
}
