//! Ollama-based LLM provider
//!
//! Wraps the OllamaClient to implement the provider trait.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::generation::{InferenceError, OllamaClient};

use super::llm::LlmProvider;

/// Ollama LLM provider for paper analysis
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: Arc::new(OllamaClient::new(config)?),
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, InferenceError> {
        self.client.generate(prompt).await
    }

    async fn health_check(&self) -> bool {
        self.client.check_model_ready().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        self.client.model()
    }

    fn endpoint(&self) -> &str {
        self.client.base_url()
    }
}
