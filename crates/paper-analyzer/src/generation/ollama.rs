//! Ollama client for readiness checks and single-shot generation

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// Shown when the generate endpoint answers without a `response` field
pub const EMPTY_RESPONSE_TEXT: &str = "No response from model.";

/// Why an inference call produced no answer
///
/// The display strings are shown to the user verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Error: AI model is not ready yet. Please wait a moment and try again.")]
    NotReady,

    #[error("Error: Request timeout - the AI service is taking too long to respond.")]
    Timeout,

    #[error("Error: Cannot connect to AI service at {base_url}. Please check if the backend is running.")]
    Connection { base_url: String },

    #[error("API Error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Error: {0}")]
    Other(String),
}

/// Ollama API client (no retries: one failed attempt is surfaced directly)
pub struct OllamaClient {
    client: Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url)
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.config.base_url)
    }

    /// Names of the models the server has pulled
    pub async fn list_models(&self) -> std::result::Result<Vec<String>, InferenceError> {
        let response = self
            .client
            .get(self.tags_url())
            .timeout(Duration::from_secs(self.config.readiness_timeout_secs))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Other(format!("Invalid model list: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// The server answers and lists the configured model
    pub async fn check_model_ready(&self) -> bool {
        match self.list_models().await {
            Ok(names) => {
                let ready = names.iter().any(|name| name.contains(&self.config.model));
                if !ready {
                    tracing::debug!(
                        "Model '{}' not among {} listed models",
                        self.config.model,
                        names.len()
                    );
                }
                ready
            }
            Err(e) => {
                tracing::debug!("Readiness check failed: {}", e);
                false
            }
        }
    }

    /// Check readiness, then send one non-streaming generation request
    pub async fn generate(&self, prompt: &str) -> std::result::Result<String, InferenceError> {
        if !self.check_model_ready().await {
            return Err(InferenceError::NotReady);
        }

        let start = Instant::now();
        tracing::info!(
            "Generating with model {} ({} prompt chars)",
            self.config.model,
            prompt.len()
        );

        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Generation failed: HTTP {}", status);
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| self.classify(e))?;

        tracing::info!("Generation finished in {:?}", start.elapsed());

        Ok(generated
            .response
            .unwrap_or_else(|| EMPTY_RESPONSE_TEXT.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout
        } else if err.is_connect() {
            InferenceError::Connection {
                base_url: self.config.base_url.clone(),
            }
        } else {
            InferenceError::Other(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> LlmConfig {
        LlmConfig {
            base_url: base_url.to_string(),
            model: "paper-analyzer".to_string(),
            temperature: 0.5,
            timeout_secs: 2,
            readiness_timeout_secs: 2,
        }
    }

    async fn mount_tags(server: &MockServer, names: &[&str]) {
        let models: Vec<_> = names.iter().map(|n| json!({ "name": n })).collect();
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_model_ready_when_listed() {
        let server = MockServer::start().await;
        mount_tags(&server, &["llama3:8b", "paper-analyzer:latest"]).await;

        let client = OllamaClient::new(&config(&server.uri())).unwrap();
        assert!(client.check_model_ready().await);
    }

    #[tokio::test]
    async fn test_model_not_ready_when_missing() {
        let server = MockServer::start().await;
        mount_tags(&server, &["llama3:8b"]).await;

        let client = OllamaClient::new(&config(&server.uri())).unwrap();
        assert!(!client.check_model_ready().await);
        assert_eq!(client.generate("hi").await, Err(InferenceError::NotReady));
    }

    #[tokio::test]
    async fn test_generate_returns_response_text() {
        let server = MockServer::start().await;
        mount_tags(&server, &["paper-analyzer:latest"]).await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({
                "model": "paper-analyzer",
                "prompt": "Summarize",
                "stream": false,
                "options": { "temperature": 0.5 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "paper-analyzer",
                "response": "A short summary.",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaClient::new(&config(&server.uri())).unwrap();
        assert_eq!(client.generate("Summarize").await.unwrap(), "A short summary.");
    }

    #[tokio::test]
    async fn test_missing_response_field() {
        let server = MockServer::start().await;
        mount_tags(&server, &["paper-analyzer"]).await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "done": true })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(&config(&server.uri())).unwrap();
        assert_eq!(client.generate("x").await.unwrap(), EMPTY_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn test_http_500_is_status_error() {
        let server = MockServer::start().await;
        mount_tags(&server, &["paper-analyzer"]).await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(&config(&server.uri())).unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert_eq!(
            err,
            InferenceError::Status {
                status: 500,
                body: "model crashed".to_string()
            }
        );
        assert_eq!(err.to_string(), "API Error: 500 - model crashed");
    }

    #[tokio::test]
    async fn test_slow_generation_is_timeout() {
        let server = MockServer::start().await;
        mount_tags(&server, &["paper-analyzer"]).await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": "late" }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = OllamaClient::new(&config(&server.uri())).unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert_eq!(err, InferenceError::Timeout);
        assert!(err.to_string().starts_with("Error: Request timeout"));
    }

    #[tokio::test]
    async fn test_connection_refused_reports_not_ready() {
        // Nothing listens on port 9 locally
        let client = OllamaClient::new(&config("http://127.0.0.1:9")).unwrap();
        assert!(!client.check_model_ready().await);
        assert_eq!(client.generate("x").await, Err(InferenceError::NotReady));
    }

    #[tokio::test]
    async fn test_connection_refused_is_classified() {
        let client = OllamaClient::new(&config("http://127.0.0.1:9")).unwrap();
        let err = client.list_models().await.unwrap_err();
        assert_eq!(
            err,
            InferenceError::Connection {
                base_url: "http://127.0.0.1:9".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "Error: Cannot connect to AI service at http://127.0.0.1:9. Please check if the backend is running."
        );
    }
}
