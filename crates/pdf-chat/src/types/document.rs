//! Document chunk types
//!
//! A chunk is a span of text extracted from the source PDF plus its embedding
//! vector. Chunks are persisted in the external Astra DB collection; the
//! embedding is only populated on the ingestion path and is never returned by
//! similarity search.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A span of text from an ingested document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Chunk ID
    pub id: Uuid,
    /// Document this chunk belongs to
    pub document_id: Uuid,
    /// Chunk text content
    pub content: String,
    /// Source filename
    pub source: String,
    /// Position of this chunk within the document
    pub chunk_index: u32,
    /// Embedding vector (empty unless freshly embedded)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl DocumentChunk {
    /// Create a new chunk without an embedding
    pub fn new(
        document_id: Uuid,
        content: impl Into<String>,
        source: impl Into<String>,
        chunk_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content: content.into(),
            source: source.into(),
            chunk_index,
            embedding: Vec::new(),
        }
    }

    /// Attach an embedding vector
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}

/// A chunk returned from similarity search with its score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: DocumentChunk,
    /// Similarity score (0.0-1.0, higher is more similar)
    pub similarity: f32,
}
