//! Intent classification and query routing
//!
//! The router composes the classifier, the business lookups, and the RAG
//! pipeline into one request/response cycle. Every failure mode inside
//! this crate resolves to a usable `BotResponse`; nothing here returns an
//! error to the caller.

pub mod classifier;
pub mod rag;
pub mod router;

pub use classifier::IntentClassifier;
pub use rag::{RagOutcome, RagPipeline, NO_MATCH_ANSWER};
pub use router::{QueryRouter, APOLOGY_ANSWER, CLARIFICATION_ANSWER};
