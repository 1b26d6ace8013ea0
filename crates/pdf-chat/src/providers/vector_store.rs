//! Vector store provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::{DocumentChunk, ScoredChunk};

/// Trait for vector storage and similarity search
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the backing collection if it does not exist
    async fn ensure_collection(&self, dimensions: usize) -> Result<()>;

    /// Insert chunks with their embeddings
    async fn insert_chunks(&self, chunks: &[DocumentChunk]) -> Result<usize>;

    /// Search for the chunks most similar to the query embedding
    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>>;

    /// Check if the store is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
