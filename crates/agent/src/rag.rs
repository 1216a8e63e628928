//! RAG Answer Pipeline
//!
//! embed -> search -> select context -> generate, with the degraded path
//! modeled as a first-class outcome instead of exception interception.
//! Retrieval failures are invisible to the end user: they get a
//! lower-quality but still relevant answer, never an error.

use std::sync::Arc;

use support_agent_core::{
    ContextChunk, Embedder, Error, KnowledgeSearch, ResponseGenerator, Result, Source,
};
use support_agent_llm::grounding_instruction;
use support_agent_rag::{ContextSelector, FallbackRetriever};

/// Canned answer when vector search returns zero matches
pub const NO_MATCH_ANSWER: &str =
    "I couldn't find a strong match for that in our knowledge base. Could \
     you rephrase the question or add a little more detail?";

/// Result of one RAG cycle
#[derive(Debug, Clone)]
pub enum RagOutcome {
    /// Answer grounded in retrieved context
    Grounded {
        answer: String,
        sources: Vec<Source>,
    },
    /// Vector search returned nothing; generation was skipped
    NoMatch { answer: String },
    /// Retrieval chain failed; answer built from local fallback context
    Degraded { answer: String, source: Source },
}

impl RagOutcome {
    pub fn answer(&self) -> &str {
        match self {
            RagOutcome::Grounded { answer, .. }
            | RagOutcome::NoMatch { answer }
            | RagOutcome::Degraded { answer, .. } => answer,
        }
    }

    pub fn sources(&self) -> Option<Vec<Source>> {
        match self {
            RagOutcome::Grounded { sources, .. } => Some(sources.clone()),
            RagOutcome::Degraded { source, .. } => Some(vec![source.clone()]),
            RagOutcome::NoMatch { .. } => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RagOutcome::Degraded { .. })
    }
}

/// The retrieval-augmented answer pipeline
pub struct RagPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn KnowledgeSearch>,
    generator: Arc<dyn ResponseGenerator>,
    selector: ContextSelector,
    fallback: FallbackRetriever,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn KnowledgeSearch>,
        generator: Arc<dyn ResponseGenerator>,
        selector: ContextSelector,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            generator,
            selector,
            fallback: FallbackRetriever::new(),
            top_k,
        }
    }

    /// Produce exactly one answer for the query. Total: any failure in the
    /// primary chain resolves through the fallback retriever.
    pub async fn answer(&self, query: &str) -> RagOutcome {
        match self.grounded_answer(query).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "Retrieval chain failed; answering from local fallback context"
                );
                metrics::counter!("rag_degraded_total").increment(1);
                self.degraded_answer(query).await
            },
        }
    }

    async fn grounded_answer(&self, query: &str) -> Result<RagOutcome> {
        let embedding = self.embedder.embed(query).await?;
        let matches = self.store.search(&embedding, self.top_k).await?;

        if matches.is_empty() {
            tracing::debug!("Vector search returned no matches; skipping generation");
            return Ok(RagOutcome::NoMatch {
                answer: NO_MATCH_ANSWER.to_string(),
            });
        }

        let chunks = self.selector.select(query, &matches);
        let instruction = grounding_instruction(&chunks);

        let answer = self.generator.generate(Some(&instruction), query).await?;
        if answer.trim().is_empty() {
            return Err(Error::Generation(
                "Empty completion from grounded generation".to_string(),
            ));
        }

        Ok(RagOutcome::Grounded {
            answer,
            sources: chunk_sources(&chunks),
        })
    }

    /// Build an answer from the local fallback chunk. Generation is
    /// retried on the degraded context; if it is unavailable too, the
    /// chunk's display text (which carries the fallback source marker) is
    /// returned directly. This path cannot fail.
    async fn degraded_answer(&self, query: &str) -> RagOutcome {
        let chunk = self.fallback.context_for(query);
        let instruction = grounding_instruction(std::slice::from_ref(&chunk));

        let answer = match self.generator.generate(Some(&instruction), query).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => chunk.display(),
            Err(error) => {
                tracing::warn!(error = %error, "Degraded generation failed; returning fallback context directly");
                chunk.display()
            },
        };

        RagOutcome::Degraded {
            answer,
            source: Source::from_doc_id(&chunk.doc_id),
        }
    }
}

/// Unique sources of the selected chunks, in selection order
fn chunk_sources(chunks: &[ContextChunk]) -> Vec<Source> {
    let mut seen: Vec<&str> = Vec::new();
    let mut sources = Vec::new();
    for chunk in chunks {
        if !seen.contains(&chunk.doc_id.as_str()) {
            seen.push(&chunk.doc_id);
            sources.push(Source::from_doc_id(&chunk.doc_id));
        }
    }
    sources
}
