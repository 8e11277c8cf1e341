//! Question, summary and quiz endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::generation::{InferenceError, PromptBuilder, ResponseFormatter};
use crate::server::state::AppState;
use crate::types::{AnalysisKind, AnalysisResponse, AskRequest, BackendStatus};

/// POST /api/sessions/:id/ask - Five-section answer to a question
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AnalysisResponse>> {
    if !state.get_session(&id)?.is_ready_for_analysis() {
        return Err(Error::NotProcessed);
    }

    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::bad_request("Please enter a question"));
    }

    tracing::info!("Question for session {}: \"{}\"", id, question);

    let max_chunks = state.config().context.qa_chunks;
    run_analysis(&state, &id, AnalysisKind::Question, max_chunks, |context| {
        PromptBuilder::build_answer_prompt(context, question)
    })
    .await
}

/// POST /api/sessions/:id/summary - Bullet-point summary
pub async fn summarize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>> {
    let max_chunks = state.config().context.summary_chunks;
    run_analysis(&state, &id, AnalysisKind::Summary, max_chunks, PromptBuilder::build_summary_prompt)
        .await
}

/// POST /api/sessions/:id/quiz - True/false comprehension quiz
pub async fn quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>> {
    let max_chunks = state.config().context.quiz_chunks;
    run_analysis(&state, &id, AnalysisKind::Quiz, max_chunks, PromptBuilder::build_quiz_prompt).await
}

/// GET /api/status - Probe the inference backend
pub async fn backend_status(State(state): State<AppState>) -> Json<BackendStatus> {
    let model_ready = state.refresh_model_ready().await;
    let provider = state.llm_provider();

    Json(BackendStatus {
        model_ready,
        base_url: provider.endpoint().to_string(),
        model: provider.model().to_string(),
        provider: provider.name().to_string(),
    })
}

/// Shared flow: check the session, build the prompt from the leading chunks,
/// generate once and render. Inference failures become an unsuccessful
/// response rather than an HTTP error.
async fn run_analysis<F>(
    state: &AppState,
    id: &Uuid,
    kind: AnalysisKind,
    max_chunks: usize,
    build_prompt: F,
) -> Result<Json<AnalysisResponse>>
where
    F: FnOnce(&str) -> String,
{
    let start = Instant::now();

    let session = state.get_session(id)?;
    if !session.is_ready_for_analysis() {
        return Err(Error::NotProcessed);
    }

    let provider = state.llm_provider();
    let model = provider.model().to_string();

    if !state.ensure_model_ready(id).await? {
        tracing::warn!("Model {} not ready, skipping {} for session {}", model, kind.as_str(), id);
        return Ok(Json(failure(kind, &InferenceError::NotReady, 0, model, start)));
    }

    let chunks_used = session.chunks.len().min(max_chunks);
    let prompt = build_prompt(&session.context(max_chunks));

    tracing::debug!(
        "Running {} for session {} ({} chunks, {} prompt chars)",
        kind.as_str(),
        id,
        chunks_used,
        prompt.len()
    );

    let response = match provider.generate(&prompt).await {
        Ok(raw) => {
            let (markdown, sections) = match kind {
                AnalysisKind::Question => {
                    let (markdown, sections) = ResponseFormatter::format_answer(&raw);
                    let missing = sections.missing();
                    if !missing.is_empty() {
                        tracing::debug!("Reply left {} sections unfilled", missing.len());
                    }
                    (markdown, Some(sections.entries()))
                }
                AnalysisKind::Summary => (ResponseFormatter::format_summary(&raw), None),
                AnalysisKind::Quiz => (ResponseFormatter::format_quiz(&raw), None),
            };

            tracing::info!(
                "{} for session {} done in {}ms",
                kind.as_str(),
                id,
                start.elapsed().as_millis()
            );

            AnalysisResponse {
                kind,
                success: true,
                markdown,
                sections,
                raw: Some(raw),
                chunks_used,
                model,
                processing_time_ms: start.elapsed().as_millis() as u64,
            }
        }
        Err(e) => {
            tracing::warn!("{} for session {} failed: {}", kind.as_str(), id, e);
            failure(kind, &e, chunks_used, model, start)
        }
    };

    Ok(Json(response))
}

fn failure(
    kind: AnalysisKind,
    err: &InferenceError,
    chunks_used: usize,
    model: String,
    start: Instant,
) -> AnalysisResponse {
    AnalysisResponse {
        kind,
        success: false,
        markdown: ResponseFormatter::format_error(err),
        sections: None,
        raw: None,
        chunks_used,
        model,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}
