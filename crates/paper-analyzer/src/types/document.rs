//! Document and chunk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata about the paper extracted in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: Uuid,
    /// Uploaded filename
    pub filename: String,
    /// SHA-256 of the extracted text (hex)
    pub content_hash: String,
    /// Number of pages reported by the PDF
    pub total_pages: Option<u32>,
    /// Characters of extracted text
    pub char_count: usize,
    /// Whitespace-separated words of extracted text
    pub word_count: usize,
    /// Size of the uploaded file in bytes
    pub size_bytes: u64,
    /// When the paper was processed
    pub processed_at: DateTime<Utc>,
}

impl Document {
    /// Create document metadata from extracted text
    pub fn new(
        filename: impl Into<String>,
        content: &str,
        content_hash: String,
        total_pages: Option<u32>,
        size_bytes: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            content_hash,
            total_pages,
            char_count: content.chars().count(),
            word_count: content.split_whitespace().count(),
            size_bytes,
            processed_at: Utc::now(),
        }
    }
}

/// One overlapping word window of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the chunk sequence (0-based)
    pub index: usize,
    /// Offset of the first word within the document (0-based)
    pub word_start: usize,
    /// Number of words in this window
    pub word_count: usize,
    /// Window words joined by single spaces
    pub content: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: usize, word_start: usize, words: &[&str]) -> Self {
        Self {
            index,
            word_start,
            word_count: words.len(),
            content: words.join(" "),
        }
    }

    /// Offset one past the last word of this window
    pub fn word_end(&self) -> usize {
        self.word_start + self.word_count
    }

    /// First `max_chars` characters followed by an ellipsis
    pub fn preview(&self, max_chars: usize) -> String {
        let cut = self
            .content
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len());
        format!("{}...", &self.content[..cut])
    }
}
