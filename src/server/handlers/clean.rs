//! Document cleaning endpoint.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::super::AppState;
use super::helpers::llm_error_response;

/// Body of `POST /clean`.
#[derive(Debug, Deserialize)]
pub struct CleanRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply of `POST /clean`.
#[derive(Debug, Serialize)]
pub struct CleanResponse {
    pub reply: String,
}

/// Clean the submitted text and return the model's version as-is.
pub async fn clean(
    State(state): State<AppState>,
    Json(request): Json<CleanRequest>,
) -> impl IntoResponse {
    let text = request.message.unwrap_or_default();
    debug!("Clean request:\n{}", text);

    match state.clean.clean(&text).await {
        Ok(reply) => Json(CleanResponse { reply }).into_response(),
        Err(e) => {
            error!("Clean failed: {}", e);
            llm_error_response(&e)
        }
    }
}
