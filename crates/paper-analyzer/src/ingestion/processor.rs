//! Ingestion pipeline: extract, validate, chunk

use std::time::Duration;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

use super::chunker::TextChunker;
use super::parser::{ParsedDocument, PdfParser};

/// Turns an uploaded PDF into document metadata and a chunk sequence
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    parser: PdfParser,
    chunker: TextChunker,
    /// Extracted text must be longer than this many characters
    min_text_chars: usize,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        Ok(Self {
            parser: PdfParser::default(),
            chunker: TextChunker::new(config.chunk_size, config.chunk_overlap)?,
            min_text_chars: config.min_text_chars,
        })
    }

    /// Override the bound on the primary PDF extractor
    pub fn with_extract_timeout(mut self, timeout: Duration) -> Self {
        self.parser = PdfParser::new(timeout);
        self
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Parse a file and reject text too short to be a paper
    pub fn parse_file(&self, filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let parsed = self.parser.parse(filename, data)?;

        let chars = parsed.content.chars().count();
        if chars <= self.min_text_chars {
            tracing::warn!(
                "Rejecting '{}': only {} chars extracted (need more than {})",
                filename,
                chars,
                self.min_text_chars
            );
            return Err(Error::InsufficientText { chars });
        }

        Ok(parsed)
    }

    /// Full ingestion: parse + validate + chunk
    pub fn ingest(&self, filename: &str, data: &[u8]) -> Result<(Document, Vec<Chunk>)> {
        let parsed = self.parse_file(filename, data)?;

        let doc = Document::new(
            filename,
            &parsed.content,
            parsed.content_hash.clone(),
            parsed.total_pages,
            data.len() as u64,
        );
        let chunks = self.chunker.chunk(&parsed.content);

        if chunks.is_empty() {
            return Err(Error::InsufficientText { chars: doc.char_count });
        }

        Ok((doc, chunks))
    }
}
