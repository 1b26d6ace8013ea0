//! PDF ingestion: parse, chunk, embed, insert
//!
//! This path is invoked explicitly through the ingest route; nothing is
//! ingested at startup.

pub mod chunker;
pub mod pdf;

use std::path::Path;
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::vector_store::VectorStore;
use crate::types::document::DocumentChunk;

pub use chunker::CharacterChunker;
pub use pdf::{parse_pdf, ParsedPdf};

/// Result of ingesting one PDF
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Assigned document ID
    pub document_id: Uuid,
    /// Source filename
    pub filename: String,
    /// Number of chunks inserted into the store
    pub chunks_inserted: usize,
}

/// Ingest a PDF from the local filesystem into the vector store
pub async fn ingest_pdf(
    path: &Path,
    config: &ChunkingConfig,
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
) -> Result<IngestOutcome> {
    let parsed = parse_pdf(path)?;
    tracing::info!(
        "Parsed '{}': {} characters of text",
        parsed.filename,
        parsed.text.len()
    );

    let chunker = CharacterChunker::new(config.chunk_size, config.chunk_overlap)?;
    let pieces = chunker.split(&parsed.text);

    let document_id = Uuid::new_v4();
    let mut chunks: Vec<DocumentChunk> = pieces
        .into_iter()
        .enumerate()
        .map(|(index, content)| {
            DocumentChunk::new(document_id, content, &parsed.filename, index as u32)
        })
        .collect();

    let texts: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;
    for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
        chunk.embedding = embedding;
    }

    store.ensure_collection(embedder.dimensions()).await?;
    let chunks_inserted = store.insert_chunks(&chunks).await?;

    tracing::info!(
        "Ingested '{}' as {} ({} chunks)",
        parsed.filename,
        document_id,
        chunks_inserted
    );

    Ok(IngestOutcome {
        document_id,
        filename: parsed.filename,
        chunks_inserted,
    })
}
