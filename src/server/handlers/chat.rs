//! Chat endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::super::AppState;
use super::helpers::{error_response, lenient_string, llm_error_response};

/// Body of `POST /chat`.
///
/// A missing or `null` message is sent as empty text. A session id that is
/// not a string starts a new session.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub session_id: Option<String>,
}

/// Reply of `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
}

/// Run one chat turn, continuing the given session or starting a new one.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    debug!(
        "Chat request: session={:?} message={:?}",
        request.session_id, request.message
    );

    let message = request.message.unwrap_or_default();
    match state
        .chat
        .send(request.session_id.as_deref(), &message)
        .await
    {
        Ok(turn) => Json(ChatResponse {
            reply: turn.reply,
            session_id: turn.session_id,
        })
        .into_response(),
        Err(e) => {
            error!("Chat turn failed: {}", e);
            llm_error_response(&e)
        }
    }
}

/// Get the history of a session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.chat.sessions().get(&session_id).await {
        Some(info) => Json(info).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Session not found"),
    }
}

/// End a session and forget its history.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    if state.chat.sessions().remove(&session_id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, "Session not found")
    }
}
