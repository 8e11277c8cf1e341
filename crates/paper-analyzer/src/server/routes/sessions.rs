//! Session lifecycle and paper processing endpoints

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ProcessResponse, SessionCreated, SessionStatus};

/// Multipart field carrying the PDF
const FILE_FIELD: &str = "file";

/// POST /api/sessions - Start a session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session = state.create_session();
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id,
            model_ready: session.model_ready,
        }),
    )
}

/// GET /api/sessions/:id - Session status
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionStatus>> {
    let session = state.get_session(&id)?;
    Ok(Json(SessionStatus::from(&session)))
}

/// DELETE /api/sessions/:id - End a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state
        .remove_session(&id)
        .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
    tracing::info!("Ended session {}", id);

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Session {} ended", id)
    })))
}

/// POST /api/sessions/:id/process - Upload, extract and chunk a paper
pub async fn process_paper(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>> {
    let start = Instant::now();

    // Unknown sessions fail before the upload is read
    state.get_session(&id)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) && field.file_name().is_none() {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("{}.pdf", Uuid::new_v4()));
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::bad_request(format!("Failed to read file: {}", e)))?;

        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| Error::bad_request("Please upload a PDF file first"))?;

    tracing::info!("Processing '{}' ({} bytes) for session {}", filename, data.len(), id);

    // Extraction is CPU bound and may block on a bad PDF
    let pipeline = state.pipeline().clone();
    let name = filename.clone();
    let (document, chunks) = tokio::task::spawn_blocking(move || pipeline.ingest(&name, &data))
        .await
        .map_err(|e| Error::internal(format!("Processing task failed: {}", e)))??;

    let chunk_count = chunks.len();
    let approx_total_words = chunks.iter().map(|c| c.word_count).sum();
    let preview = chunks
        .first()
        .map(|c| c.preview(state.config().chunking.preview_chars))
        .unwrap_or_default();

    let loaded = document.clone();
    state.update_session(&id, move |session| session.load_paper(loaded, chunks))?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Processed '{}': {} words in {} chunks ({}ms)",
        filename,
        document.word_count,
        chunk_count,
        processing_time_ms
    );

    Ok(Json(ProcessResponse {
        success: true,
        message: format!("Processed! Split into {} sections", chunk_count),
        document,
        chunk_count,
        approx_total_words,
        preview,
        processing_time_ms,
    }))
}
