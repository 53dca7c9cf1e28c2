//! Web server exposing the chat and clean endpoints.
//!
//! Provides:
//! - `POST /chat` for multi-turn sales-pitch conversations with session memory
//! - `POST /clean` for cleaning (chunked) documents
//! - session inspection/removal and model status endpoints

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::llm::{ChatBackend, LlmClient, LlmConfig};
use crate::services::{ChatService, CleanService};
use crate::session::SessionStore;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub clean: Arc<CleanService>,
    pub backend: Arc<dyn ChatBackend>,
    pub llm_config: Arc<LlmConfig>,
}

impl AppState {
    /// Build state backed by the Ollama client described by `config`.
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        let backend: Arc<dyn ChatBackend> = Arc::new(LlmClient::new(config.clone())?);
        Ok(Self::with_backend(backend, config))
    }

    /// Build state around an arbitrary model backend.
    pub fn with_backend(backend: Arc<dyn ChatBackend>, config: &LlmConfig) -> Self {
        let sessions = Arc::new(SessionStore::new(
            config.get_system_prompt(),
            config.max_sessions,
        ));

        Self {
            chat: Arc::new(ChatService::new(
                backend.clone(),
                sessions,
                config.chat_model.clone(),
            )),
            clean: Arc::new(CleanService::new(backend.clone(), config)),
            backend,
            llm_config: Arc::new(config.clone()),
        }
    }
}

/// Start the web server and run until Ctrl+C.
pub async fn serve(config: &LlmConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
