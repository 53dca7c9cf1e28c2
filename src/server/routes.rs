//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route(
            "/chat/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/clean", post(handlers::clean))
        .route("/health", get(handlers::health))
        .route("/api/models", get(handlers::api_models))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
