//! LLM integration for the sales-pitch chat and document cleaning.
//!
//! Uses a local LLM (via Ollama) for both.

mod client;

pub use client::{
    render_clean_prompt, ChatBackend, ChatMessage, ChatRole, LlmClient, LlmConfig, LlmError,
    CLEAN_PROMPT, SYSTEM_PROMPT_CHAT,
};
