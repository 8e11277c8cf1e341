//! Application state for the analyzer server

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AnalyzerConfig;
use crate::error::{Error, Result};
use crate::ingestion::IngestPipeline;
use crate::providers::{LlmProvider, OllamaLlm};
use crate::types::Session;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AnalyzerConfig,
    /// LLM provider (Ollama)
    llm_provider: Arc<dyn LlmProvider>,
    /// Extraction + chunking pipeline
    pipeline: IngestPipeline,
    /// Live sessions keyed by id
    sessions: DashMap<Uuid, Session>,
    /// Last known backend readiness
    model_ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state backed by Ollama
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let llm = Arc::new(OllamaLlm::new(&config.llm)?);
        tracing::info!(
            "Ollama provider initialized ({} at {})",
            config.llm.model,
            config.llm.base_url
        );
        Self::with_provider(config, llm)
    }

    /// Create state with an explicit provider
    pub fn with_provider(config: AnalyzerConfig, llm_provider: Arc<dyn LlmProvider>) -> Result<Self> {
        let pipeline = IngestPipeline::new(&config.chunking)?;
        tracing::info!(
            "Chunking: {} words per window, {} overlap",
            config.chunking.chunk_size,
            config.chunking.chunk_overlap
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                llm_provider,
                pipeline,
                sessions: DashMap::new(),
                model_ready: RwLock::new(false),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.inner.config
    }

    /// Get LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Get ingestion pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Last known backend readiness
    pub fn is_model_ready(&self) -> bool {
        *self.inner.model_ready.read()
    }

    /// Ask the backend whether the model is ready and remember the answer
    pub async fn refresh_model_ready(&self) -> bool {
        let ready = self.inner.llm_provider.health_check().await;
        let previous = std::mem::replace(&mut *self.inner.model_ready.write(), ready);
        if ready != previous {
            tracing::info!("Inference backend ready: {}", ready);
        }
        ready
    }

    /// Start a new session
    pub fn create_session(&self) -> Session {
        // Readiness is confirmed per session on its first action
        let session = Session::new();
        self.inner.sessions.insert(session.id, session.clone());
        tracing::debug!("Created session {}", session.id);
        session
    }

    /// Snapshot of a live session; expired sessions are dropped
    pub fn get_session(&self, id: &Uuid) -> Result<Session> {
        self.update_session(id, |session| session.clone())
    }

    /// Mutate a live session in place
    pub fn update_session<T, F>(&self, id: &Uuid, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> T,
    {
        let ttl = self.session_ttl();
        let now = chrono::Utc::now();

        let expired = match self.inner.sessions.get_mut(id) {
            Some(mut session) => {
                if session.is_expired(ttl, now) {
                    true
                } else {
                    session.touch();
                    return Ok(f(&mut *session));
                }
            }
            None => return Err(Error::SessionNotFound(id.to_string())),
        };

        if expired {
            self.inner.sessions.remove(id);
            tracing::info!("Session {} expired", id);
        }
        Err(Error::SessionNotFound(id.to_string()))
    }

    /// End a session, dropping all of its state
    pub fn remove_session(&self, id: &Uuid) -> Option<Session> {
        self.inner.sessions.remove(id).map(|(_, s)| s)
    }

    /// Session-scoped readiness: once the model answered for a session it stays ready
    pub async fn ensure_model_ready(&self, id: &Uuid) -> Result<bool> {
        if self.get_session(id)?.model_ready {
            return Ok(true);
        }
        let ready = self.refresh_model_ready().await;
        if ready {
            self.update_session(id, |s| s.model_ready = true)?;
        }
        Ok(ready)
    }

    /// Drop sessions idle for longer than the configured TTL
    pub fn sweep_expired(&self) -> usize {
        let ttl = self.session_ttl();
        let now = chrono::Utc::now();
        let before = self.inner.sessions.len();
        self.inner.sessions.retain(|_, s| !s.is_expired(ttl, now));
        let removed = before.saturating_sub(self.inner.sessions.len());
        if removed > 0 {
            tracing::info!("Expired {} idle sessions", removed);
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }

    fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.inner.config.session.ttl_secs as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubLlm;

    fn state(ttl_secs: u64, llm: StubLlm) -> AppState {
        let mut config = AnalyzerConfig::default();
        config.session.ttl_secs = ttl_secs;
        AppState::with_provider(config, Arc::new(llm)).unwrap()
    }

    #[test]
    fn test_session_lifecycle() {
        let state = state(3600, StubLlm::ready("ok"));
        let session = state.create_session();

        assert!(state.get_session(&session.id).is_ok());
        assert_eq!(state.session_count(), 1);

        assert!(state.remove_session(&session.id).is_some());
        assert!(matches!(state.get_session(&session.id), Err(Error::SessionNotFound(_))));
    }

    #[test]
    fn test_expired_session_is_dropped() {
        let state = state(0, StubLlm::ready("ok"));
        let session = state.create_session();
        std::thread::sleep(std::time::Duration::from_millis(20));

        assert!(matches!(state.get_session(&session.id), Err(Error::SessionNotFound(_))));
        assert_eq!(state.session_count(), 0);
    }

    #[test]
    fn test_sweep_expired() {
        let state = state(0, StubLlm::ready("ok"));
        state.create_session();
        state.create_session();
        std::thread::sleep(std::time::Duration::from_millis(20));

        assert_eq!(state.sweep_expired(), 2);
        assert_eq!(state.session_count(), 0);
    }

    #[tokio::test]
    async fn test_model_ready_is_cached_per_session() {
        let llm = StubLlm::ready("ok");
        let calls = llm.health_calls();
        let state = state(3600, llm);
        let session = state.create_session();

        assert!(state.ensure_model_ready(&session.id).await.unwrap());
        assert!(state.ensure_model_ready(&session.id).await.unwrap());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(state.is_model_ready());
    }

    #[tokio::test]
    async fn test_new_session_checks_readiness_itself() {
        let llm = StubLlm::ready("ok");
        let calls = llm.health_calls();
        let state = state(3600, llm);

        assert!(state.refresh_model_ready().await);
        let session = state.create_session();
        assert!(!session.model_ready);

        assert!(state.ensure_model_ready(&session.id).await.unwrap());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert!(state.get_session(&session.id).unwrap().model_ready);
    }

    #[tokio::test]
    async fn test_not_ready_is_rechecked() {
        let llm = StubLlm::not_ready();
        let calls = llm.health_calls();
        let state = state(3600, llm);
        let session = state.create_session();

        assert!(!state.ensure_model_ready(&session.id).await.unwrap());
        assert!(!state.ensure_model_ready(&session.id).await.unwrap());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert!(!state.get_session(&session.id).unwrap().model_ready);
    }
}
