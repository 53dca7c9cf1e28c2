//! Document cleaning service.
//!
//! Sends text to the model with the clean prompt, chunk by chunk, and
//! stitches the cleaned pieces back together. No session memory is used.

use std::sync::Arc;

use tracing::{debug, info};

use crate::llm::{render_clean_prompt, ChatBackend, ChatMessage, LlmConfig, LlmError};
use crate::utils::chunk_text;

/// Separator placed between cleaned chunks.
pub const CHUNK_JOINER: &str = "\n\n";

/// Service for cleaning documents with the model.
pub struct CleanService {
    backend: Arc<dyn ChatBackend>,
    model: String,
    prompt: String,
    max_chunk_chars: usize,
}

impl CleanService {
    pub fn new(backend: Arc<dyn ChatBackend>, config: &LlmConfig) -> Self {
        Self {
            backend,
            model: config.clean_model.clone(),
            prompt: config.get_clean_prompt().to_string(),
            max_chunk_chars: config.max_chunk_chars,
        }
    }

    /// Clean `text`, processing oversized input sequentially in chunks.
    ///
    /// The first failing chunk aborts the whole operation.
    pub async fn clean(&self, text: &str) -> Result<String, LlmError> {
        let chunks = chunk_text(text, self.max_chunk_chars);
        if chunks.len() > 1 {
            info!(
                "Cleaning {} chars in {} chunks of at most {}",
                text.len(),
                chunks.len(),
                self.max_chunk_chars
            );
        }

        let mut cleaned = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            debug!("Cleaning chunk {}/{}", i + 1, chunks.len());
            let message = ChatMessage::user(render_clean_prompt(&self.prompt, chunk));
            let reply = self.backend.chat(&self.model, &[message]).await?;
            cleaned.push(reply);
        }

        Ok(cleaned.join(CHUNK_JOINER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatRole;
    use crate::test_support::ScriptedBackend;

    fn config(max_chunk_chars: usize) -> LlmConfig {
        let mut config = LlmConfig::base_default();
        config.clean_model = "qwen:1.8b".to_string();
        config.clean_prompt = Some("clean: {text}".to_string());
        config.max_chunk_chars = max_chunk_chars;
        config
    }

    #[tokio::test]
    async fn test_small_text_is_one_request() {
        let backend = Arc::new(ScriptedBackend::new(["Hello, world."]));
        let service = CleanService::new(backend.clone(), &config(1000));

        let cleaned = service.clean("helo   wrld!!").await.unwrap();
        assert_eq!(cleaned, "Hello, world.");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "qwen:1.8b");
        assert_eq!(calls[0].1.len(), 1);
        assert_eq!(calls[0].1[0].role, ChatRole::User);
        assert_eq!(calls[0].1[0].content, "clean: helo   wrld!!");
    }

    #[tokio::test]
    async fn test_default_prompt_wraps_text_in_quotes() {
        let backend = Arc::new(ScriptedBackend::echo());
        let service = CleanService::new(backend.clone(), &LlmConfig::base_default());

        service.clean("some text").await.unwrap();
        assert_eq!(
            backend.calls()[0].1[0].content,
            "Can you please clean this text and reply only with the clean one?: \"some text\""
        );
    }

    #[tokio::test]
    async fn test_oversized_text_is_chunked_in_order() {
        let backend = Arc::new(ScriptedBackend::echo());
        let service = CleanService::new(backend.clone(), &config(10));

        let cleaned = service.clean("aaaa\n\nbbbb\n\ncccc").await.unwrap();
        assert_eq!(
            cleaned,
            "[clean] clean: aaaa\n\nbbbb\n\n[clean] clean: cccc"
        );
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_whitespace_only_oversized_text_skips_model() {
        let backend = Arc::new(ScriptedBackend::echo());
        let service = CleanService::new(backend.clone(), &config(4));

        assert_eq!(service.clean("          ").await.unwrap(), "");
        assert!(backend.calls().is_empty());

        // Blank text that fits is still one request.
        service.clean("  ").await.unwrap();
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_aborts() {
        let backend = Arc::new(ScriptedBackend::new(["first"]));
        backend.fail_next();
        let service = CleanService::new(backend.clone(), &config(10));

        assert!(service.clean("aaaa\n\nbbbb\n\ncccc").await.is_err());
        assert_eq!(backend.calls().len(), 1);
    }
}
