//! Knowledge Base Ingestion
//!
//! Loads FAQ records from YAML/JSON files, embeds them, and upserts them
//! into the vector store keyed by record id. Runs offline (the `ingest`
//! binary); the query path only ever reads.

use serde::{Deserialize, Serialize};
use std::path::Path;

use support_agent_core::{Embedder, KnowledgeRecord};

use crate::{RagError, VectorStore};

/// Knowledge base file format
#[derive(Debug, Serialize, Deserialize)]
pub struct KnowledgeFile {
    /// Version for format compatibility
    #[serde(default)]
    pub version: Option<String>,
    /// FAQ records (embeddings are computed at ingest time, not stored)
    pub records: Vec<KnowledgeRecord>,
}

/// Knowledge loader for populating the vector store
pub struct KnowledgeLoader;

impl KnowledgeLoader {
    /// Parse a knowledge file (YAML or JSON by extension)
    pub fn load_file(path: &Path) -> Result<KnowledgeFile, RagError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RagError::Ingestion(format!("Failed to read file: {}", e)))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match extension {
            "json" => serde_json::from_str(&content)
                .map_err(|e| RagError::Ingestion(format!("JSON parse error: {}", e))),
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| RagError::Ingestion(format!("YAML parse error: {}", e))),
            _ => Err(RagError::Ingestion(format!(
                "Unsupported file type: {}",
                extension
            ))),
        }
    }

    /// Embed and upsert all records from a knowledge file.
    ///
    /// Ensures the collection exists with the embedder's dimension first
    /// (recreating on mismatch), then validates every embedding length
    /// before writing. Returns the number of records ingested.
    pub async fn ingest(
        path: &Path,
        embedder: &dyn Embedder,
        store: &VectorStore,
    ) -> Result<usize, RagError> {
        let file = Self::load_file(path)?;

        if embedder.dim() != store.dim() {
            return Err(RagError::Dimension {
                expected: store.dim(),
                actual: embedder.dim(),
            });
        }

        store.ensure_collection().await?;

        let mut records = Vec::with_capacity(file.records.len());
        for record in file.records {
            let embedding = embedder
                .embed(&Self::embedding_text(&record))
                .await
                .map_err(|e| RagError::Embedding(e.to_string()))?;

            if embedding.len() != store.dim() {
                return Err(RagError::Dimension {
                    expected: store.dim(),
                    actual: embedding.len(),
                });
            }

            records.push(KnowledgeRecord { embedding, ..record });
        }

        if !records.is_empty() {
            store.upsert(&records).await?;
        }

        tracing::info!(
            file = %path.display(),
            records = records.len(),
            "Knowledge base ingestion complete"
        );

        Ok(records.len())
    }

    /// Text embedded for a record: question and answer together, so both
    /// phrasings of a topic land near user queries.
    fn embedding_text(record: &KnowledgeRecord) -> String {
        format!("{}\n{}", record.question, record.answer)
    }

    /// Create an example knowledge file showing the expected format
    pub fn create_sample_file(path: &Path) -> Result<(), RagError> {
        let sample = KnowledgeFile {
            version: Some("1.0".to_string()),
            records: vec![
                KnowledgeRecord {
                    id: "faq-returns-001".to_string(),
                    doc_id: "returns-policy".to_string(),
                    question: "What is your return policy?".to_string(),
                    answer: "Items can be returned within 30 days of delivery for a full \
                             refund, provided they are unused and in original packaging."
                        .to_string(),
                    embedding: Vec::new(),
                },
                KnowledgeRecord {
                    id: "faq-shipping-001".to_string(),
                    doc_id: "shipping-policy".to_string(),
                    question: "How long does shipping take?".to_string(),
                    answer: "Standard shipping takes 3-5 business days. Express shipping \
                             delivers the next business day for orders placed before 2pm."
                        .to_string(),
                    embedding: Vec::new(),
                },
            ],
        };

        let yaml = serde_yaml::to_string(&sample)
            .map_err(|e| RagError::Ingestion(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, yaml)
            .map_err(|e| RagError::Ingestion(format!("Failed to write file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sample_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample_faq.yaml");

        KnowledgeLoader::create_sample_file(&path).unwrap();
        let parsed = KnowledgeLoader::load_file(&path).unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].doc_id, "returns-policy");
        assert!(parsed.records[0].embedding.is_empty());
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("faq.txt");
        std::fs::write(&path, "records: []").unwrap();

        assert!(KnowledgeLoader::load_file(&path).is_err());
    }

    #[test]
    fn test_yaml_without_records_key_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("faq.yaml");
        std::fs::write(&path, "version: '1.0'").unwrap();

        assert!(KnowledgeLoader::load_file(&path).is_err());
    }

    #[test]
    fn test_embedding_text_includes_both_fields() {
        let record = KnowledgeRecord {
            id: "faq-001".to_string(),
            doc_id: "returns-policy".to_string(),
            question: "Can I return sale items?".to_string(),
            answer: "Sale items are final sale.".to_string(),
            embedding: Vec::new(),
        };

        let text = KnowledgeLoader::embedding_text(&record);
        assert!(text.contains("Can I return sale items?"));
        assert!(text.contains("Sale items are final sale."));
    }
}
