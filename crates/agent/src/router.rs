//! Query Router
//!
//! The orchestrator: one request in, one `BotResponse` out, never an
//! error. A classifier miss must never produce a dead end, so every
//! branch that cannot run its lookup falls toward the RAG pipeline, which
//! is itself total.

use support_agent_core::{BotResponse, Intent};
use support_agent_tools::{order_status, product_info};

use crate::classifier::IntentClassifier;
use crate::rag::RagPipeline;

/// Returned for intents the router does not recognize
pub const CLARIFICATION_ANSWER: &str =
    "I'm not quite sure what you're asking. Could you rephrase that, or \
     tell me whether it's about an order, a product, or one of our \
     policies?";

/// Returned on unrecoverable internal failure
pub const APOLOGY_ANSWER: &str =
    "Sorry, something went wrong on our side while handling that. Please \
     try again in a moment.";

/// The query router
pub struct QueryRouter {
    classifier: IntentClassifier,
    rag: RagPipeline,
}

impl QueryRouter {
    pub fn new(classifier: IntentClassifier, rag: RagPipeline) -> Self {
        Self { classifier, rag }
    }

    /// Response for callers that caught an unexpected failure outside the
    /// router (the router itself never produces one).
    pub fn general_failure_response() -> BotResponse {
        BotResponse::new(APOLOGY_ANSWER, Intent::General)
    }

    /// Route one query to its handler and return the answer.
    ///
    /// Ordered decision procedure, first match wins:
    /// 1. classify;
    /// 2. Order_Status with a usable detail -> order lookup;
    /// 3. Product_Info unless details is "General" -> product lookup,
    ///    keyed by the detail or, when extraction failed, the raw query;
    /// 4. everything else (including failed detail checks) -> RAG;
    /// 5. unrecognized intent -> clarification request.
    pub async fn route(&self, query: &str) -> BotResponse {
        let classification = self.classifier.classify(query).await;

        tracing::info!(
            intent = %classification.intent,
            has_detail = classification.has_detail(),
            "Classified query"
        );

        let response = match classification.intent {
            Intent::OrderStatus if classification.has_detail() => {
                let report = order_status(&classification.details);
                BotResponse::new(report.message, Intent::OrderStatus)
            },
            Intent::ProductInfo
                if !classification.details.trim().eq_ignore_ascii_case("general") =>
            {
                let key = if classification.has_detail() {
                    classification.details.as_str()
                } else {
                    query
                };
                let answer = product_info(key);
                BotResponse::new(answer.message, Intent::ProductInfo)
            },
            Intent::General => BotResponse::new(CLARIFICATION_ANSWER, Intent::General),
            // RAG, plus Order_Status/Product_Info that failed their detail
            // check: still surface a grounded answer
            _ => {
                let outcome = self.rag.answer(query).await;
                let sources = outcome.sources();
                let mut response = BotResponse::new(outcome.answer(), Intent::Rag);
                if let Some(sources) = sources {
                    response = response.with_sources(sources);
                }
                response
            },
        };

        metrics::counter!("queries_total", "intent" => response.intent.as_str()).increment(1);
        response
    }
}
