//! Provider abstraction for the inference backend

pub mod llm;
pub mod ollama;

pub use llm::LlmProvider;
pub use ollama::OllamaLlm;
