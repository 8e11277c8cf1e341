//! Configuration for the paper analyzer

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable holding the inference server base URL
pub const OLLAMA_URL_ENV: &str = "OLLAMA_URL";
/// Environment variable overriding the generation model name
pub const OLLAMA_MODEL_ENV: &str = "OLLAMA_MODEL";
/// Environment variable pointing at an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "PAPER_ANALYZER_CONFIG";
const HOST_ENV: &str = "PAPER_ANALYZER_HOST";
const PORT_ENV: &str = "PAPER_ANALYZER_PORT";

/// Main analyzer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// How many chunks each action sends as context
    #[serde(default)]
    pub context: ContextConfig,
    /// Session lifetime configuration
    #[serde(default)]
    pub session: SessionConfig,
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `PAPER_ANALYZER_CONFIG` (if set) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(OLLAMA_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.llm.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup(OLLAMA_MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.llm.model = model.trim().to_string();
        }
        if let Some(host) = lookup(HOST_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }
        if let Some(port) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid {}: {}", PORT_ENV, e)))?;
        }
        Ok(())
    }

    /// Reject parameter combinations the chunker cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size in words
    pub chunk_size: usize,
    /// Overlap between consecutive windows in words
    pub chunk_overlap: usize,
    /// Extracted text must be longer than this many characters
    pub min_text_chars: usize,
    /// Characters of the first chunk shown as a preview
    pub preview_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 100,
            min_text_chars: 100,
            preview_chars: 500,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Generation request timeout in seconds
    pub timeout_secs: u64,
    /// Model listing (readiness) timeout in seconds
    pub readiness_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "paper-analyzer".to_string(),
            temperature: 0.5,
            timeout_secs: 120,
            readiness_timeout_secs: 10,
        }
    }
}

/// Number of leading chunks used as context per action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub qa_chunks: usize,
    pub summary_chunks: usize,
    pub quiz_chunks: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            qa_chunks: 3,
            summary_chunks: 5,
            quiz_chunks: 4,
        }
    }
}

/// Session lifetime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle time after which a session is dropped
    pub ttl_secs: u64,
    /// How often the sweeper looks for expired sessions
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            sweep_interval_secs: 60,
        }
    }
}
