//! LLM client for chat and text cleaning.
//!
//! Talks to the Ollama chat API of a local inference daemon.

mod config;
mod prompts;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use config::LlmConfig;
pub use prompts::{render_clean_prompt, CLEAN_PROMPT, SYSTEM_PROMPT_CHAT};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in a conversation, in Ollama's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A model backend that can answer a conversation.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the full conversation and return the assistant's reply.
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Names of the models the backend can serve.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;

    /// Whether the backend answers at all.
    async fn is_available(&self) -> bool;
}

/// HTTP client for the Ollama API.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// Ollama chat request format.
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat response format.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn map_send_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::Connection(err.to_string())
        }
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request = OllamaChatRequest {
            model,
            messages,
            stream: false,
            options: self
                .config
                .temperature
                .map(|temperature| OllamaOptions { temperature }),
        };

        let url = format!("{}/api/chat", self.config.base_url());
        debug!("Sending {} messages to {} ({})", messages.len(), url, model);

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let chat_resp: OllamaChatResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.config.timeout_secs)
            } else {
                LlmError::Parse(e.to_string())
            }
        })?;

        Ok(chat_resp.message.content)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.config.base_url());
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        #[derive(Deserialize)]
        struct TagsResponse {
            models: Vec<ModelInfo>,
        }

        #[derive(Deserialize)]
        struct ModelInfo {
            name: String,
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url());
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to the inference daemon
    #[error("Connection error: {0}")]
    Connection(String),

    /// The daemon did not answer within the configured timeout
    #[error("Model did not answer within {0}s")]
    Timeout(u64),

    /// The daemon answered with a non-success status
    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
}
