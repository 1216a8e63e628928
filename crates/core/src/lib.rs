//! Core traits and types for the support agent
//!
//! This crate provides the foundational types used across all other crates:
//! - Intent and response types for the query router
//! - Knowledge base record and search result types
//! - Core traits for pluggable backends (embedding, search, generation)
//! - Error types

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    BotResponse, Classification, ContextChunk, FaqMatch, Intent, KnowledgeRecord, Source,
};

pub use traits::{Embedder, KnowledgeSearch, ResponseGenerator};
