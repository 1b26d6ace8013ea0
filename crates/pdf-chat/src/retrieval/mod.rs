//! Per-message similarity search
//!
//! Embeds the question and fetches the most similar stored chunks. The two
//! external calls run sequentially; there is no per-message parallelism.

use crate::error::Result;
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::vector_store::VectorStore;
use crate::types::document::ScoredChunk;

/// Fetch the `top_k` chunks most similar to the question
pub async fn similar_chunks(
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
    question: &str,
    top_k: usize,
) -> Result<Vec<ScoredChunk>> {
    let query_embedding = embedder.embed(question).await?;
    let results = store.search(&query_embedding, top_k).await?;

    tracing::debug!(
        "Retrieved {} chunks for question ({} chars)",
        results.len(),
        question.len()
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::document::DocumentChunk;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.1, 0.2, 0.3])
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct RecordingStore {
        requested_top_k: Mutex<Vec<usize>>,
        results: Vec<ScoredChunk>,
    }

    impl RecordingStore {
        fn with_chunks(contents: &[&str]) -> Self {
            let results = contents
                .iter()
                .map(|content| ScoredChunk {
                    chunk: DocumentChunk::new(Uuid::nil(), *content, "paper.pdf", 0),
                    similarity: 0.9,
                })
                .collect();
            Self {
                requested_top_k: Mutex::new(Vec::new()),
                results,
            }
        }
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn ensure_collection(&self, _dimensions: usize) -> Result<()> {
            Ok(())
        }

        async fn insert_chunks(&self, _chunks: &[DocumentChunk]) -> Result<usize> {
            Err(Error::Internal("not used".to_string()))
        }

        async fn search(
            &self,
            _query_embedding: &[f32],
            top_k: usize,
        ) -> Result<Vec<ScoredChunk>> {
            self.requested_top_k.lock().unwrap().push(top_k);
            Ok(self.results.clone())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn requests_exactly_top_k_documents() {
        let store = RecordingStore::with_chunks(&["a", "b", "c"]);

        let results = similar_chunks(&FixedEmbedder, &store, "what is this about?", 3)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(*store.requested_top_k.lock().unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn empty_store_yields_no_chunks() {
        let store = RecordingStore::with_chunks(&[]);

        let results = similar_chunks(&FixedEmbedder, &store, "anything", 3)
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
