//! HTTP client for the pitchcraft web server.
//!
//! Used by the interactive CLI modes.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Reply to a chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
struct CleanReply {
    reply: String,
}

#[derive(Debug, Serialize)]
struct ChatPayload<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CleanPayload<'a> {
    message: &'a str,
}

/// Client for the chat and clean endpoints.
pub struct ServerClient {
    base_url: Url,
    client: Client,
    timeout_secs: u64,
    /// Clean requests cover one model call per chunk, so they get their own bound.
    clean_timeout_secs: u64,
}

impl ServerClient {
    /// Create a client for the server at `base_url`.
    ///
    /// Clean requests use the same timeout until [`with_clean_timeout`](Self::with_clean_timeout) is called.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        // A trailing slash keeps `join` from dropping the last path segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            timeout_secs,
            clean_timeout_secs: timeout_secs,
        })
    }

    pub fn with_clean_timeout(mut self, secs: u64) -> Self {
        self.clean_timeout_secs = secs;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        timeout_secs: u64,
    ) -> Result<reqwest::Response, ClientError> {
        let resp = self
            .client
            .post(self.endpoint(path)?)
            .timeout(Duration::from_secs(timeout_secs))
            .json(body)
            .send()
            .await
            .map_err(|e| map_request_error(e, timeout_secs))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }
        Ok(resp)
    }

    /// Send a chat message, continuing `session_id` if given.
    pub async fn chat(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ClientError> {
        let payload = ChatPayload {
            message,
            session_id,
        };
        let resp = self.post("chat", &payload, self.timeout_secs).await?;
        resp.json()
            .await
            .map_err(|e| map_body_error(e, self.timeout_secs))
    }

    /// Ask the server to clean a document.
    pub async fn clean(&self, text: &str) -> Result<String, ClientError> {
        let payload = CleanPayload { message: text };
        let resp = self
            .post("clean", &payload, self.clean_timeout_secs)
            .await?;
        let reply: CleanReply = resp
            .json()
            .await
            .map_err(|e| map_body_error(e, self.clean_timeout_secs))?;
        Ok(reply.reply)
    }

    /// Whether the server answers its health check.
    pub async fn health(&self) -> bool {
        let Ok(url) = self.endpoint("health") else {
            return false;
        };
        match self.client.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

fn map_request_error(err: reqwest::Error, timeout_secs: u64) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(timeout_secs)
    } else {
        ClientError::Connection(err.to_string())
    }
}

fn map_body_error(err: reqwest::Error, timeout_secs: u64) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(timeout_secs)
    } else {
        ClientError::Parse(err.to_string())
    }
}

/// Errors talking to the web server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Could not reach server: {0}")]
    Connection(String),

    #[error("Server did not answer within {0}s")]
    Timeout(u64),

    #[error("Server returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected server response: {0}")]
    Parse(String),
}
