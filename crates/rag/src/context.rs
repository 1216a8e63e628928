//! Context Selection
//!
//! Reduces raw search matches to the small ordered set of grounding
//! chunks handed to the generator. Document preference is a pluggable
//! ranking adjustment: search quality under degraded embeddings is
//! unreliable, so a keyword-correlated document hint keeps answers
//! coherent when the vectors are noise.

use std::sync::Arc;

use support_agent_core::{ContextChunk, FaqMatch};

/// Ranking adjustment strategy
///
/// Implementations:
/// - `NoBoost` - default path, top-K by score
/// - `KeywordBoost` - prefer matches from a keyword-correlated document
pub trait RankingAdjustment: Send + Sync {
    /// Document id to prefer for this query, if any
    fn preferred_document(&self, query: &str) -> Option<String>;
}

/// No adjustment: selection follows search ranking order
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBoost;

impl RankingAdjustment for NoBoost {
    fn preferred_document(&self, _query: &str) -> Option<String> {
        None
    }
}

/// A keyword group correlated with one knowledge document
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub doc_id: String,
}

impl KeywordRule {
    pub fn new(keywords: &[&str], doc_id: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            doc_id: doc_id.to_string(),
        }
    }
}

/// Keyword-correlated document preference
#[derive(Debug, Clone)]
pub struct KeywordBoost {
    rules: Vec<KeywordRule>,
}

impl KeywordBoost {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }
}

impl Default for KeywordBoost {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new(&["return", "refund", "exchange"], "returns-policy"),
            KeywordRule::new(&["ship", "shipping", "delivery", "deliver"], "shipping-policy"),
            KeywordRule::new(&["warranty", "repair", "broken"], "warranty-guide"),
            KeywordRule::new(&["payment", "billing", "invoice", "charge"], "billing-faq"),
        ])
    }
}

impl RankingAdjustment for KeywordBoost {
    fn preferred_document(&self, query: &str) -> Option<String> {
        let query = query.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| query.contains(k.as_str())))
            .map(|rule| rule.doc_id.clone())
    }
}

/// Context selector
///
/// Invariants: returns at most `max_chunks` chunks, and returns zero only
/// when the underlying search returned zero matches.
pub struct ContextSelector {
    max_chunks: usize,
    adjustment: Arc<dyn RankingAdjustment>,
}

impl ContextSelector {
    pub fn new(max_chunks: usize, adjustment: Arc<dyn RankingAdjustment>) -> Self {
        Self {
            max_chunks,
            adjustment,
        }
    }

    /// Selector with the default keyword-boost rules
    pub fn with_default_boost(max_chunks: usize) -> Self {
        Self::new(max_chunks, Arc::new(KeywordBoost::default()))
    }

    /// Select grounding chunks from ranked matches.
    ///
    /// When a preferred document applies, matches from that document are
    /// taken first; an empty filter result falls back to the unfiltered
    /// top-N so a bad hint never empties the context.
    pub fn select(&self, query: &str, matches: &[FaqMatch]) -> Vec<ContextChunk> {
        if matches.is_empty() {
            return Vec::new();
        }

        let selected: Vec<&FaqMatch> = match self.adjustment.preferred_document(query) {
            Some(doc_id) => {
                let preferred: Vec<&FaqMatch> = matches
                    .iter()
                    .filter(|m| m.doc_id == doc_id)
                    .take(self.max_chunks)
                    .collect();

                if preferred.is_empty() {
                    tracing::debug!(
                        doc_id = %doc_id,
                        "Preferred document absent from matches; using unfiltered ranking"
                    );
                    matches.iter().take(self.max_chunks).collect()
                } else {
                    preferred
                }
            },
            None => matches.iter().take(self.max_chunks).collect(),
        };

        selected
            .into_iter()
            .map(|m| ContextChunk::new(m.doc_id.clone(), m.answer.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faq(doc_id: &str, answer: &str, score: f32) -> FaqMatch {
        FaqMatch {
            score,
            doc_id: doc_id.to_string(),
            question: String::new(),
            answer: answer.to_string(),
        }
    }

    fn sample_matches() -> Vec<FaqMatch> {
        vec![
            faq("shipping-policy", "Standard shipping takes 3-5 days.", 0.9),
            faq("returns-policy", "Returns accepted within 30 days.", 0.8),
            faq("shipping-policy", "Express shipping is next-day.", 0.7),
            faq("billing-faq", "We accept all major cards.", 0.6),
            faq("returns-policy", "Refunds take 5-7 business days.", 0.5),
        ]
    }

    #[test]
    fn test_empty_matches_give_empty_context() {
        let selector = ContextSelector::with_default_boost(3);
        assert!(selector.select("anything", &[]).is_empty());
    }

    #[test]
    fn test_never_more_than_max_chunks() {
        let selector = ContextSelector::with_default_boost(3);
        let chunks = selector.select("hello", &sample_matches());
        assert!(chunks.len() <= 3);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn test_keyword_preference_filters_by_document() {
        let selector = ContextSelector::with_default_boost(3);
        let chunks = selector.select("What's your return policy?", &sample_matches());

        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.doc_id == "returns-policy"));
    }

    #[test]
    fn test_missing_preferred_document_falls_back_to_ranking() {
        let selector = ContextSelector::with_default_boost(3);
        // Warranty rule matches but no warranty-guide records exist
        let chunks = selector.select("Is there a warranty?", &sample_matches());

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].doc_id, "shipping-policy");
    }

    #[test]
    fn test_no_boost_takes_top_by_rank() {
        let selector = ContextSelector::new(3, Arc::new(NoBoost));
        let chunks = selector.select("What's your return policy?", &sample_matches());

        // With the no-op adjustment, ranking order wins even for keyword queries
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].doc_id, "shipping-policy");
        assert_eq!(chunks[1].doc_id, "returns-policy");
    }

    #[test]
    fn test_chunks_carry_answer_text() {
        let selector = ContextSelector::new(3, Arc::new(NoBoost));
        let chunks = selector.select("shipping", &sample_matches()[..1]);
        assert_eq!(chunks[0].text, "Standard shipping takes 3-5 days.");
    }
}
