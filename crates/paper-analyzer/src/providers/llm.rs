//! LLM provider trait for generating analysis text

use async_trait::async_trait;

use crate::generation::InferenceError;

/// Trait for text generation backends
///
/// Implementations:
/// - `OllamaLlm`: local Ollama server
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a reply to a fully assembled prompt
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;

    /// Check if the backend is reachable and has the model loaded
    async fn health_check(&self) -> bool;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Base URL of the backend, for status reporting
    fn endpoint(&self) -> &str;
}
