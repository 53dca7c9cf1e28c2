//! In-memory chat session store.
//!
//! Each session holds the conversation history sent to the model on every
//! turn. History always starts with the system prompt; after it, user
//! messages and assistant replies are only ever recorded in pairs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::llm::ChatMessage;

/// Snapshot of a session, as exposed by the API.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Result of resolving a client-supplied session id.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub session_id: String,
    /// History to send before the new user message.
    pub history: Vec<ChatMessage>,
    /// Whether the session was created by this call.
    pub created: bool,
}

#[derive(Debug)]
struct Session {
    messages: Vec<ChatMessage>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    /// Monotonic activity counter used for eviction order.
    touched: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    by_id: HashMap<String, Session>,
    clock: u64,
}

impl Sessions {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .by_id
            .iter()
            .min_by_key(|(_, s)| s.touched)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            info!("Evicting least recently active session {}", id);
            self.by_id.remove(&id);
        }
    }
}

/// Thread-safe store of chat sessions keyed by UUID.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<Sessions>,
    system_prompt: String,
    /// Maximum number of live sessions (0 = unbounded).
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(system_prompt: impl Into<String>, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            system_prompt: system_prompt.into(),
            max_sessions,
        }
    }

    /// Look up a session, or start a new one when the id is missing or unknown.
    ///
    /// An unknown id is never adopted; the caller receives a fresh id.
    pub async fn resolve(&self, session_id: Option<&str>) -> ResolvedSession {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = session_id.filter(|id| !id.is_empty()) {
            if let Some(session) = sessions.by_id.get(id) {
                return ResolvedSession {
                    session_id: id.to_string(),
                    history: session.messages.clone(),
                    created: false,
                };
            }
            debug!("Unknown session {}, starting a new one", id);
        }

        if self.max_sessions > 0 {
            while sessions.by_id.len() >= self.max_sessions {
                sessions.evict_least_recent();
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let touched = sessions.tick();
        let messages = vec![ChatMessage::system(self.system_prompt.clone())];
        sessions.by_id.insert(
            id.clone(),
            Session {
                messages: messages.clone(),
                created_at: now,
                last_active: now,
                touched,
            },
        );
        info!("Created chat session {}", id);

        ResolvedSession {
            session_id: id,
            history: messages,
            created: true,
        }
    }

    /// Record a completed turn. Returns false if the session no longer exists.
    pub async fn commit(&self, session_id: &str, user: ChatMessage, assistant: ChatMessage) -> bool {
        let mut sessions = self.sessions.write().await;
        let touched = sessions.tick();
        match sessions.by_id.get_mut(session_id) {
            Some(session) => {
                session.messages.push(user);
                session.messages.push(assistant);
                session.last_active = Utc::now();
                session.touched = touched;
                true
            }
            None => false,
        }
    }

    /// Get a snapshot of a session.
    pub async fn get(&self, session_id: &str) -> Option<SessionInfo> {
        let sessions = self.sessions.read().await;
        sessions.by_id.get(session_id).map(|s| SessionInfo {
            session_id: session_id.to_string(),
            messages: s.messages.clone(),
            created_at: s.created_at,
            last_active: s.last_active,
        })
    }

    /// Drop a session. Returns whether it existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.by_id.remove(session_id).is_some()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
