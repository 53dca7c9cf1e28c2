//! Sales-pitch chat service.
//!
//! Runs one conversational turn against the model using session memory.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm::{ChatBackend, ChatMessage, LlmError};
use crate::session::SessionStore;

/// Outcome of a chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub reply: String,
    pub session_id: String,
}

/// Service for multi-turn chat with the model.
pub struct ChatService {
    backend: Arc<dyn ChatBackend>,
    sessions: Arc<SessionStore>,
    model: String,
}

impl ChatService {
    pub fn new(backend: Arc<dyn ChatBackend>, sessions: Arc<SessionStore>, model: String) -> Self {
        Self {
            backend,
            sessions,
            model,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Send a user message within a session, creating the session if needed.
    ///
    /// The model call runs without holding the session lock. On failure nothing
    /// is recorded, and a session created for this turn is discarded.
    pub async fn send(&self, session_id: Option<&str>, message: &str) -> Result<ChatTurn, LlmError> {
        let resolved = self.sessions.resolve(session_id).await;
        debug!(
            "Session {}: user message ({} chars)",
            resolved.session_id,
            message.len()
        );

        let user = ChatMessage::user(message);
        let mut history = resolved.history;
        history.push(user.clone());

        let reply = match self.backend.chat(&self.model, &history).await {
            Ok(reply) => reply,
            Err(e) => {
                if resolved.created {
                    self.sessions.remove(&resolved.session_id).await;
                }
                return Err(e);
            }
        };

        if !self
            .sessions
            .commit(
                &resolved.session_id,
                user,
                ChatMessage::assistant(reply.clone()),
            )
            .await
        {
            warn!(
                "Session {} ended while awaiting the model; reply not recorded",
                resolved.session_id
            );
        }

        Ok(ChatTurn {
            reply,
            session_id: resolved.session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatRole;
    use crate::test_support::{GatedBackend, ScriptedBackend};

    fn service(backend: Arc<ScriptedBackend>) -> ChatService {
        ChatService::new(
            backend,
            Arc::new(SessionStore::new("Be skeptical.", 0)),
            "mistral:7b".to_string(),
        )
    }

    #[tokio::test]
    async fn test_conversation_keeps_context() {
        let backend = Arc::new(ScriptedBackend::new(["What is it?", "Why would I need that?"]));
        let chat = service(backend.clone());

        let first = chat.send(None, "I have a product for you").await.unwrap();
        assert_eq!(first.reply, "What is it?");

        let second = chat
            .send(Some(&first.session_id), "A self-sharpening pencil")
            .await
            .unwrap();
        assert_eq!(second.session_id, first.session_id);
        assert_eq!(second.reply, "Why would I need that?");

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, "mistral:7b");
        let sent: Vec<_> = calls[1].1.iter().map(|m| (m.role, m.content.as_str())).collect();
        assert_eq!(
            sent,
            vec![
                (ChatRole::System, "Be skeptical."),
                (ChatRole::User, "I have a product for you"),
                (ChatRole::Assistant, "What is it?"),
                (ChatRole::User, "A self-sharpening pencil"),
            ]
        );

        let info = chat.sessions().get(&first.session_id).await.unwrap();
        assert_eq!(info.messages.len(), 5);
    }

    #[tokio::test]
    async fn test_failed_turn_is_not_recorded() {
        let backend = Arc::new(ScriptedBackend::new(["Tell me more."]));
        let chat = service(backend.clone());
        let id = chat.send(None, "Hello").await.unwrap().session_id;

        backend.fail_next();
        assert!(chat.send(Some(&id), "Please buy").await.is_err());

        let info = chat.sessions().get(&id).await.unwrap();
        assert_eq!(info.messages.len(), 3);
        assert_eq!(info.messages[1].content, "Hello");
    }

    #[tokio::test]
    async fn test_failed_first_turn_discards_new_session() {
        let backend = Arc::new(ScriptedBackend::new(Vec::<String>::new()));
        backend.fail_next();
        let chat = service(backend);

        assert!(chat.send(None, "Hello").await.is_err());
        assert!(chat.sessions().is_empty().await);
    }

    fn gated_service(backend: Arc<GatedBackend>, max_sessions: usize) -> Arc<ChatService> {
        Arc::new(ChatService::new(
            backend,
            Arc::new(SessionStore::new("Be skeptical.", max_sessions)),
            "mistral:7b".to_string(),
        ))
    }

    /// Start a session with one completed turn and return its id.
    async fn open_session(chat: &Arc<ChatService>, backend: &GatedBackend) -> String {
        let turn = {
            let chat = chat.clone();
            tokio::spawn(async move { chat.send(None, "Hello").await })
        };
        backend.wait_for_calls(1).await;
        backend.answer(0, "Who are you?");
        turn.await.unwrap().unwrap().session_id
    }

    #[tokio::test]
    async fn test_concurrent_turns_commit_in_completion_order() {
        let backend = Arc::new(GatedBackend::new());
        let chat = gated_service(backend.clone(), 0);
        let id = open_session(&chat, &backend).await;

        let slow = {
            let (chat, id) = (chat.clone(), id.clone());
            tokio::spawn(async move { chat.send(Some(&id), "First pitch").await })
        };
        backend.wait_for_calls(2).await;
        let fast = {
            let (chat, id) = (chat.clone(), id.clone());
            tokio::spawn(async move { chat.send(Some(&id), "Second pitch").await })
        };
        backend.wait_for_calls(3).await;

        // Both turns were sent the same snapshot.
        assert_eq!(backend.history(1).len(), 4);
        assert_eq!(backend.history(2).len(), 4);
        assert_eq!(backend.history(2)[3].content, "Second pitch");

        backend.answer(2, "Not interested.");
        assert_eq!(fast.await.unwrap().unwrap().reply, "Not interested.");
        backend.answer(1, "Too expensive.");
        assert_eq!(slow.await.unwrap().unwrap().reply, "Too expensive.");

        let contents: Vec<_> = chat
            .sessions()
            .get(&id)
            .await
            .unwrap()
            .messages
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(
            contents,
            vec![
                "Be skeptical.",
                "Hello",
                "Who are you?",
                "Second pitch",
                "Not interested.",
                "First pitch",
                "Too expensive.",
            ]
        );
    }

    #[tokio::test]
    async fn test_session_deleted_mid_turn_still_gets_reply() {
        let backend = Arc::new(GatedBackend::new());
        let chat = gated_service(backend.clone(), 0);
        let id = open_session(&chat, &backend).await;

        let turn = {
            let (chat, id) = (chat.clone(), id.clone());
            tokio::spawn(async move { chat.send(Some(&id), "Buy it").await })
        };
        backend.wait_for_calls(2).await;
        assert!(chat.sessions().remove(&id).await);

        backend.answer(1, "No.");
        let turn = turn.await.unwrap().unwrap();
        assert_eq!(turn.reply, "No.");
        assert_eq!(turn.session_id, id);
        assert!(chat.sessions().get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_session_evicted_mid_turn_still_gets_reply() {
        let backend = Arc::new(GatedBackend::new());
        let chat = gated_service(backend.clone(), 1);
        let id = open_session(&chat, &backend).await;

        let turn = {
            let (chat, id) = (chat.clone(), id.clone());
            tokio::spawn(async move { chat.send(Some(&id), "Buy it").await })
        };
        backend.wait_for_calls(2).await;

        // A new session takes the only slot.
        let other = chat.sessions().resolve(None).await;
        assert!(other.created);

        backend.answer(1, "No.");
        assert_eq!(turn.await.unwrap().unwrap().reply, "No.");
        assert!(chat.sessions().get(&id).await.is_none());
        assert_eq!(chat.sessions().len().await, 1);
    }
}
