//! API routes for the analyzer server

pub mod analyze;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Session lifecycle
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/:id",
            get(sessions::get_session_status).delete(sessions::delete_session),
        )
        // Paper upload - with larger body limit for PDFs
        .route(
            "/sessions/:id/process",
            post(sessions::process_paper).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Analysis actions
        .route("/sessions/:id/ask", post(analyze::ask))
        .route("/sessions/:id/summary", post(analyze::summarize))
        .route("/sessions/:id/quiz", post(analyze::quiz))
        // Backend readiness
        .route("/status", get(analyze::backend_status))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "paper-analyzer",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Research paper Q&A, summaries and quizzes backed by a local Ollama model",
        "endpoints": {
            "GET /api/status": "Inference backend readiness",
            "POST /api/sessions": "Start a session",
            "GET /api/sessions/:id": "Session status",
            "DELETE /api/sessions/:id": "End a session",
            "POST /api/sessions/:id/process": "Upload and process a PDF (multipart field `file`)",
            "POST /api/sessions/:id/ask": "Ask a question about the paper",
            "POST /api/sessions/:id/summary": "Summarize the paper",
            "POST /api/sessions/:id/quiz": "Generate a true/false quiz"
        }
    }))
}
