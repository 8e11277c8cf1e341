//! Core types for the paper analyzer

pub mod document;
pub mod query;
pub mod response;
pub mod session;

pub use document::{Chunk, Document};
pub use query::{AnalysisKind, AskRequest};
pub use response::{AnalysisResponse, BackendStatus, ProcessResponse, SessionCreated, SessionStatus};
pub use session::Session;
