//! Sliding word-window chunking

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Splits text into overlapping windows measured in words
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Words per window
    chunk_size: usize,
    /// Words shared by consecutive windows
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker; the overlap must be smaller than the window
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk size must be at least one word".to_string()));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into ordered windows covering every word
    ///
    /// Windows advance by `chunk_size - overlap` words and stop at the first
    /// window that reaches the last word.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::with_capacity(self.expected_chunks(words.len()));
        let mut start = 0usize;

        loop {
            let end = (start + self.chunk_size).min(words.len());
            chunks.push(Chunk::new(chunks.len(), start, &words[start..end]));
            if end >= words.len() {
                break;
            }
            start += step;
        }

        tracing::debug!(
            "Chunked {} words into {} windows (size {}, overlap {})",
            words.len(),
            chunks.len(),
            self.chunk_size,
            self.overlap
        );

        chunks
    }

    /// Number of windows `chunk` produces for `word_count` words
    pub fn expected_chunks(&self, word_count: usize) -> usize {
        if word_count == 0 {
            0
        } else if word_count <= self.overlap {
            1
        } else {
            let step = self.chunk_size - self.overlap;
            (word_count - self.overlap).div_ceil(step)
        }
    }
}
