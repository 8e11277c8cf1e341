//! paper-analyzer: research paper Q&A, summaries and quizzes over a local Ollama model
//!
//! A paper is uploaded as a PDF, its text extracted and split into overlapping
//! word windows, and the leading windows are sent as context with one of three
//! fixed prompts. Replies to questions are split into five labeled sections.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AnalyzerConfig;
pub use error::{Error, Result};
pub use generation::{InferenceError, OllamaClient, ResponseFormatter, ResponseSections};
pub use ingestion::{IngestPipeline, TextChunker};
pub use server::AnalyzerServer;
pub use types::{Chunk, Document, Session};
