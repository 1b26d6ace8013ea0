//! Fixed-size character chunking with overlap

use crate::error::{Error, Result};

/// Character-based text splitter
pub struct CharacterChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks
    overlap: usize,
}

impl CharacterChunker {
    /// Create a new chunker; overlap must be smaller than the chunk size
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk size must be non-zero".to_string()));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk overlap ({overlap}) must be smaller than chunk size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Split text into chunks of `chunk_size` characters, stepping by
    /// `chunk_size - overlap`. Never splits inside a code point.
    pub fn split(&self, text: &str) -> Vec<String> {
        // Byte offsets of every char boundary plus the end of the text
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let total_chars = boundaries.len() - 1;

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < total_chars {
            let end = (start + self.chunk_size).min(total_chars);
            let chunk = text[boundaries[start]..boundaries[end]].trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
            if end == total_chars {
                break;
            }
            start += step;
        }

        chunks
    }
}
