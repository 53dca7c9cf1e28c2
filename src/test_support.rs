//! Test doubles shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};

use crate::llm::{ChatBackend, ChatMessage, LlmError};

/// A backend that answers from a fixed script and records every call.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    fail_next: AtomicBool,
    echo: bool,
}

impl ScriptedBackend {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
            echo: false,
        }
    }

    /// Replies with `[clean] ` followed by the last message's content.
    pub fn echo() -> Self {
        Self {
            echo: true,
            ..Self::new(Vec::<String>::new())
        }
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(LlmError::Connection("connection refused".to_string()));
        }
        if self.echo {
            let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
            return Ok(format!("[clean] {last}"));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Parse("script exhausted".to_string()))
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(vec!["mistral:7b".to_string()])
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// A backend whose calls stay pending until the test answers them.
///
/// Calls are numbered in arrival order.
#[derive(Default)]
pub struct GatedBackend {
    pending: Mutex<Vec<Option<oneshot::Sender<String>>>>,
    histories: Mutex<Vec<Vec<ChatMessage>>>,
    arrived: Notify,
}

impl GatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until at least `n` calls have reached the backend.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.pending.lock().unwrap().len() < n {
            self.arrived.notified().await;
        }
    }

    /// Complete call number `index` with `reply`.
    pub fn answer(&self, index: usize, reply: &str) {
        let sender = self.pending.lock().unwrap()[index]
            .take()
            .expect("call already answered");
        let _ = sender.send(reply.to_string());
    }

    /// History sent with call number `index`.
    pub fn history(&self, index: usize) -> Vec<ChatMessage> {
        self.histories.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl ChatBackend for GatedBackend {
    async fn chat(&self, _model: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let (tx, rx) = oneshot::channel();
        {
            self.histories.lock().unwrap().push(messages.to_vec());
            self.pending.lock().unwrap().push(Some(tx));
        }
        self.arrived.notify_one();
        rx.await
            .map_err(|_| LlmError::Connection("gate dropped".to_string()))
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(Vec::new())
    }

    async fn is_available(&self) -> bool {
        true
    }
}
