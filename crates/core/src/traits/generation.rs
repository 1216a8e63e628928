//! Generation backend trait

use async_trait::async_trait;

use crate::Result;

/// Text generation interface
///
/// Implementations:
/// - `GeminiBackend` - Gemini generateContent API (support-agent-llm)
///
/// Two modes: free-text generation for grounded answers, and strict-schema
/// structured output for classification.
#[async_trait]
pub trait ResponseGenerator: Send + Sync + 'static {
    /// Generate free text for `user_message`, optionally steered by a
    /// system instruction. An empty completion is reported as-is; callers
    /// decide whether that is an error.
    async fn generate(&self, system_instruction: Option<&str>, user_message: &str)
        -> Result<String>;

    /// Generate JSON constrained by `schema` and return the parsed value.
    ///
    /// The backend enforces the schema server-side where supported;
    /// callers must still treat the result as untrusted and fall back on
    /// parse mismatch.
    async fn generate_structured(
        &self,
        system_instruction: &str,
        user_message: &str,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockGenerator;

    #[async_trait]
    impl ResponseGenerator for MockGenerator {
        async fn generate(
            &self,
            _system_instruction: Option<&str>,
            _user_message: &str,
        ) -> Result<String> {
            Ok("Mock answer".to_string())
        }

        async fn generate_structured(
            &self,
            _system_instruction: &str,
            _user_message: &str,
            _schema: serde_json::Value,
        ) -> Result<serde_json::Value> {
            Ok(serde_json::json!({"intent": "RAG", "details": "None"}))
        }

        fn model_name(&self) -> &str {
            "mock-generator"
        }
    }

    #[tokio::test]
    async fn test_mock_generator() {
        let generator = MockGenerator;
        assert_eq!(generator.model_name(), "mock-generator");

        let text = generator.generate(Some("be brief"), "hello").await.unwrap();
        assert_eq!(text, "Mock answer");

        let value = generator
            .generate_structured("classify", "hello", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(value["intent"], "RAG");
    }
}
