//! Vector Store using Qdrant
//!
//! Dense storage and similarity search over ingested FAQ records. The
//! collection's vector dimension must match the embedding dimension D
//! exactly; `ensure_collection` recreates the collection when an existing
//! one was built with a different dimension.

use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        value::Kind, vectors_config, CreateCollectionBuilder, Distance, PointStruct,
        SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
    },
    Qdrant,
};
use std::collections::HashMap;

use support_agent_core::{Error, FaqMatch, KnowledgeRecord, KnowledgeSearch, Result};

use crate::RagError;

/// Vector store configuration
#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    /// Qdrant endpoint
    pub endpoint: String,
    /// Collection name
    pub collection: String,
    /// Vector dimension D
    pub vector_dim: usize,
    /// API key (optional)
    pub api_key: Option<String>,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:6334".to_string(),
            collection: "support_faq".to_string(),
            vector_dim: 768,
            api_key: None,
        }
    }
}

/// Qdrant-backed knowledge store
pub struct VectorStore {
    client: Qdrant,
    config: VectorStoreConfig,
}

impl VectorStore {
    /// Create a new vector store connection
    pub fn new(config: VectorStoreConfig) -> std::result::Result<Self, RagError> {
        let mut builder = Qdrant::from_url(&config.endpoint);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| RagError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Embedding dimension the collection is keyed to
    pub fn dim(&self) -> usize {
        self.config.vector_dim
    }

    /// Create the collection if missing; recreate it if its dimension does
    /// not match the configured D.
    pub async fn ensure_collection(&self) -> std::result::Result<(), RagError> {
        let exists = self
            .client
            .collection_exists(&self.config.collection)
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        if exists {
            match self.collection_dim().await? {
                Some(dim) if dim == self.config.vector_dim as u64 => return Ok(()),
                dim => {
                    tracing::warn!(
                        collection = %self.config.collection,
                        existing_dim = ?dim,
                        expected_dim = self.config.vector_dim,
                        "Collection dimension mismatch; recreating"
                    );
                    self.client
                        .delete_collection(&self.config.collection)
                        .await
                        .map_err(|e| RagError::VectorStore(e.to_string()))?;
                },
            }
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.config.collection).vectors_config(
                    VectorParamsBuilder::new(self.config.vector_dim as u64, Distance::Cosine),
                ),
            )
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        tracing::info!(
            collection = %self.config.collection,
            dim = self.config.vector_dim,
            "Collection ready"
        );

        Ok(())
    }

    /// Read the existing collection's vector dimension, when determinable
    async fn collection_dim(&self) -> std::result::Result<Option<u64>, RagError> {
        let info = self
            .client
            .collection_info(&self.config.collection)
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        let dim = info
            .result
            .and_then(|r| r.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config)
            .and_then(|c| match c {
                vectors_config::Config::Params(params) => Some(params.size),
                vectors_config::Config::ParamsMap(_) => None,
            });

        Ok(dim)
    }

    /// Upsert knowledge records keyed by id.
    ///
    /// Every embedding must have exactly the configured dimension; a
    /// mismatch is a hard ingestion-time error.
    pub async fn upsert(&self, records: &[KnowledgeRecord]) -> std::result::Result<(), RagError> {
        for record in records {
            if record.embedding.len() != self.config.vector_dim {
                return Err(RagError::Dimension {
                    expected: self.config.vector_dim,
                    actual: record.embedding.len(),
                });
            }
        }

        let points: Vec<PointStruct> = records
            .iter()
            .map(|record| {
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("answer".to_string(), record.answer.clone().into());
                payload.insert("doc_id".to_string(), record.doc_id.clone().into());
                payload.insert("question".to_string(), record.question.clone().into());

                PointStruct::new(record.id.clone(), record.embedding.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.config.collection, points))
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        Ok(())
    }

    /// Nearest-neighbor search returning scored matches with metadata
    pub async fn search_matches(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> std::result::Result<Vec<FaqMatch>, RagError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.config.collection,
                    query_embedding.to_vec(),
                    top_k as u64,
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| RagError::Search(e.to_string()))?;

        let matches: Vec<FaqMatch> = results
            .result
            .into_iter()
            .map(|point| {
                let mut doc_id = String::new();
                let mut question = String::new();
                let mut answer = String::new();

                for (key, value) in point.payload {
                    if let Some(Kind::StringValue(s)) = value.kind {
                        match key.as_str() {
                            "answer" => answer = s,
                            "doc_id" => doc_id = s,
                            "question" => question = s,
                            _ => {},
                        }
                    }
                }

                FaqMatch {
                    score: point.score,
                    doc_id,
                    question,
                    answer,
                }
            })
            .collect();

        Ok(matches)
    }

    /// Connectivity probe for the readiness endpoint
    pub async fn health(&self) -> bool {
        self.client.health_check().await.is_ok()
    }
}

#[async_trait]
impl KnowledgeSearch for VectorStore {
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<FaqMatch>> {
        self.search_matches(vector, top_k).await.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = VectorStoreConfig::default();
        assert_eq!(config.vector_dim, 768);
        assert_eq!(config.collection, "support_faq");
    }

    #[tokio::test]
    async fn test_upsert_rejects_wrong_dimension() {
        let store = VectorStore::new(VectorStoreConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            vector_dim: 768,
            ..Default::default()
        })
        .unwrap();

        let record = KnowledgeRecord {
            id: "faq-001".to_string(),
            doc_id: "returns-policy".to_string(),
            question: "Can I return an item?".to_string(),
            answer: "Yes, within 30 days.".to_string(),
            embedding: vec![0.1; 512],
        };

        // Fails on validation before any network call
        let err = store.upsert(&[record]).await.unwrap_err();
        assert!(matches!(
            err,
            RagError::Dimension {
                expected: 768,
                actual: 512
            }
        ));
    }
}
