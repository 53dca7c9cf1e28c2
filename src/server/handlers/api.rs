//! Service status endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use super::super::AppState;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Reply of `GET /api/models`.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub chat_model: String,
    pub clean_model: String,
    pub available: bool,
    pub models: Vec<String>,
}

/// Configured models and what the inference daemon currently offers.
pub async fn api_models(State(state): State<AppState>) -> impl IntoResponse {
    let (available, models) = match state.backend.list_models().await {
        Ok(models) => (true, models),
        Err(e) => {
            warn!("Could not list models: {}", e);
            (false, Vec::new())
        }
    };

    Json(ModelsResponse {
        chat_model: state.llm_config.chat_model.clone(),
        clean_model: state.llm_config.clean_model.clone(),
        available,
        models,
    })
}
