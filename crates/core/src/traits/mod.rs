//! Core traits for pluggable backends
//!
//! Every external collaborator the router touches sits behind one of these
//! traits so tests can swap in deterministic implementations.

mod embedder;
mod generation;
mod knowledge;

pub use embedder::Embedder;
pub use generation::ResponseGenerator;
pub use knowledge::KnowledgeSearch;
