//! Response types for the HTTP API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Document;
use super::query::AnalysisKind;
use super::session::Session;
use crate::generation::formatter::SectionEntry;

/// Returned when a session is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub model_ready: bool,
}

/// Snapshot of a session for the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub processed: bool,
    pub model_ready: bool,
    pub chunk_count: usize,
    /// Sum of words over all chunks, overlap included
    pub approx_total_words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
}

impl From<&Session> for SessionStatus {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            processed: session.processed,
            model_ready: session.model_ready,
            chunk_count: session.chunks.len(),
            approx_total_words: session.total_chunk_words(),
            document: session.document.clone(),
        }
    }
}

/// Result of processing an uploaded paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: String,
    pub document: Document,
    pub chunk_count: usize,
    pub approx_total_words: usize,
    /// Start of the first chunk
    pub preview: String,
    pub processing_time_ms: u64,
}

/// Result of one analysis action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub kind: AnalysisKind,
    /// False when the inference call failed; `markdown` then holds the error
    pub success: bool,
    /// Rendered Markdown shown on the page
    pub markdown: String,
    /// Labeled sections (question answers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionEntry>>,
    /// Raw model reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    pub chunks_used: usize,
    pub model: String,
    pub processing_time_ms: u64,
}

/// Inference backend readiness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStatus {
    pub model_ready: bool,
    pub base_url: String,
    pub model: String,
    pub provider: String,
}
