//! Intent Classifier
//!
//! One structured-generation call labels the query as RAG, Order_Status,
//! or Product_Info and extracts the auxiliary detail (an order id or a
//! product name). Every failure mode (provider error, malformed output,
//! unknown label) fails open to RAG with empty details: classification
//! errors must never become user-visible errors.

use serde::Deserialize;
use std::sync::Arc;

use support_agent_core::{Classification, Error, Intent, ResponseGenerator, Result};
use support_agent_llm::{classification_instruction, classification_schema};

/// Structured classifier output
#[derive(Debug, Deserialize)]
struct ClassifierVerdict {
    intent: String,
    #[serde(default)]
    details: Option<String>,
}

/// LLM-backed intent classifier
pub struct IntentClassifier {
    generator: Arc<dyn ResponseGenerator>,
}

impl IntentClassifier {
    pub fn new(generator: Arc<dyn ResponseGenerator>) -> Self {
        Self { generator }
    }

    /// Classify a query. Total: failures fall open to RAG.
    pub async fn classify(&self, query: &str) -> Classification {
        match self.try_classify(query).await {
            Ok(classification) => classification,
            Err(error) => {
                tracing::warn!(error = %error, "Classification failed; failing open to RAG");
                Classification::fallback()
            },
        }
    }

    async fn try_classify(&self, query: &str) -> Result<Classification> {
        let value = self
            .generator
            .generate_structured(&classification_instruction(), query, classification_schema())
            .await?;

        let verdict: ClassifierVerdict = serde_json::from_value(value)
            .map_err(|e| Error::Classification(format!("Malformed classifier output: {}", e)))?;

        let intent = match verdict.intent.as_str() {
            "RAG" => Intent::Rag,
            "Order_Status" => Intent::OrderStatus,
            "Product_Info" => Intent::ProductInfo,
            other => {
                return Err(Error::Classification(format!(
                    "Unrecognized intent label: {}",
                    other
                )))
            },
        };

        Ok(Classification {
            intent,
            details: verdict.details.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Generator that always returns a fixed structured value or error
    struct FixedGenerator {
        result: std::result::Result<serde_json::Value, String>,
    }

    impl FixedGenerator {
        fn ok(value: serde_json::Value) -> Arc<Self> {
            Arc::new(Self { result: Ok(value) })
        }

        fn err(message: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Err(message.to_string()),
            })
        }
    }

    #[async_trait]
    impl ResponseGenerator for FixedGenerator {
        async fn generate(
            &self,
            _system_instruction: Option<&str>,
            _user_message: &str,
        ) -> Result<String> {
            Ok("unused".to_string())
        }

        async fn generate_structured(
            &self,
            _system_instruction: &str,
            _user_message: &str,
            _schema: serde_json::Value,
        ) -> Result<serde_json::Value> {
            self.result
                .clone()
                .map_err(Error::Generation)
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_order_status_classification() {
        let generator = FixedGenerator::ok(serde_json::json!({
            "intent": "Order_Status",
            "details": "ABC1234"
        }));
        let classifier = IntentClassifier::new(generator);

        let c = classifier.classify("Where is order ABC1234?").await;
        assert_eq!(c.intent, Intent::OrderStatus);
        assert_eq!(c.details, "ABC1234");
        assert!(c.has_detail());
    }

    #[tokio::test]
    async fn test_sentinel_details_pass_through() {
        let generator = FixedGenerator::ok(serde_json::json!({
            "intent": "Product_Info",
            "details": "None"
        }));
        let classifier = IntentClassifier::new(generator);

        let c = classifier.classify("tell me about your products").await;
        assert_eq!(c.intent, Intent::ProductInfo);
        assert!(!c.has_detail());
    }

    #[tokio::test]
    async fn test_missing_details_field_defaults_empty() {
        let generator = FixedGenerator::ok(serde_json::json!({"intent": "RAG"}));
        let classifier = IntentClassifier::new(generator);

        let c = classifier.classify("what is your return policy").await;
        assert_eq!(c.intent, Intent::Rag);
        assert_eq!(c.details, "");
    }

    #[tokio::test]
    async fn test_unknown_label_fails_open() {
        let generator = FixedGenerator::ok(serde_json::json!({
            "intent": "Chitchat",
            "details": "None"
        }));
        let classifier = IntentClassifier::new(generator);

        let c = classifier.classify("hello there").await;
        assert_eq!(c, Classification::fallback());
    }

    #[tokio::test]
    async fn test_malformed_output_fails_open() {
        let generator = FixedGenerator::ok(serde_json::json!({"intent": 42}));
        let classifier = IntentClassifier::new(generator);

        let c = classifier.classify("anything").await;
        assert_eq!(c, Classification::fallback());
    }

    #[tokio::test]
    async fn test_backend_error_fails_open() {
        let generator = FixedGenerator::err("provider unavailable");
        let classifier = IntentClassifier::new(generator);

        let c = classifier.classify("anything").await;
        assert_eq!(c, Classification::fallback());
    }
}
