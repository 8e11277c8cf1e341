//! Per-user session state

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::document::{Chunk, Document};

/// Transient state for one user's interaction with the tool
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    /// A paper has been extracted and chunked
    pub processed: bool,
    /// The inference backend has answered a readiness check
    pub model_ready: bool,
    pub document: Option<Document>,
    pub chunks: Vec<Chunk>,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            processed: false,
            model_ready: false,
            document: None,
            chunks: Vec::new(),
            created_at: now,
            last_accessed: now,
        }
    }

    /// Replace the current paper with a freshly processed one
    pub fn load_paper(&mut self, document: Document, chunks: Vec<Chunk>) {
        self.processed = !chunks.is_empty();
        self.document = Some(document);
        self.chunks = chunks;
    }

    /// Is there something to analyze
    pub fn is_ready_for_analysis(&self) -> bool {
        self.processed && !self.chunks.is_empty()
    }

    /// Leading chunks joined with blank lines, used as prompt context
    pub fn context(&self, max_chunks: usize) -> String {
        self.chunks
            .iter()
            .take(max_chunks)
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Approximate words across all chunks (overlap counted twice)
    pub fn total_chunk_words(&self) -> usize {
        self.chunks.iter().map(|c| c.word_count).sum()
    }

    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_accessed > ttl
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
