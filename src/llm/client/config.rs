//! LLM client configuration.

use serde::{Deserialize, Serialize};

use super::prompts::{CLEAN_PROMPT, SYSTEM_PROMPT_CHAT};

/// Configuration for the Ollama client and the services built on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama API endpoint (without the `/api/...` suffix)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model used for the sales-pitch chat
    #[serde(default = "default_model")]
    pub chat_model: String,
    /// Model used to clean documents
    #[serde(default = "default_model")]
    pub clean_model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature; the model's own default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Custom system prompt for chat sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Custom clean prompt (uses the {text} placeholder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_prompt: Option<String>,
    /// Maximum characters sent to the model per clean request (0 = no chunking)
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    /// Maximum number of live chat sessions (0 = unbounded)
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "mistral:7b".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_chunk_chars() -> usize {
    8000
}

fn default_max_sessions() -> usize {
    1000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    pub(crate) fn base_default() -> Self {
        Self {
            endpoint: default_endpoint(),
            chat_model: default_model(),
            clean_model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
            system_prompt: None,
            clean_prompt: None,
            max_chunk_chars: default_max_chunk_chars(),
            max_sessions: default_max_sessions(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENDPOINT`: Ollama endpoint
    /// - `LLM_CHAT_MODEL`: Model for chat sessions
    /// - `LLM_CLEAN_MODEL`: Model for document cleaning
    /// - `LLM_TIMEOUT`: Request timeout in seconds
    /// - `LLM_TEMPERATURE`: Generation temperature
    /// - `LLM_SYSTEM_PROMPT`: Custom chat system prompt
    /// - `LLM_CLEAN_PROMPT`: Custom clean prompt
    /// - `LLM_MAX_CHUNK_CHARS`: Chunk size for cleaning
    /// - `LLM_MAX_SESSIONS`: Session cap
    ///
    /// Values that fail to parse are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub(crate) fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("LLM_ENDPOINT") {
            self.endpoint = val;
        }
        if let Some(val) = lookup("LLM_CHAT_MODEL") {
            self.chat_model = val;
        }
        if let Some(val) = lookup("LLM_CLEAN_MODEL") {
            self.clean_model = val;
        }
        if let Some(n) = lookup("LLM_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        if let Some(t) = lookup("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = Some(t);
        }
        if let Some(val) = lookup("LLM_SYSTEM_PROMPT") {
            self.system_prompt = Some(val);
        }
        if let Some(val) = lookup("LLM_CLEAN_PROMPT") {
            self.clean_prompt = Some(val);
        }
        if let Some(n) = lookup("LLM_MAX_CHUNK_CHARS").and_then(|v| v.parse().ok()) {
            self.max_chunk_chars = n;
        }
        if let Some(n) = lookup("LLM_MAX_SESSIONS").and_then(|v| v.parse().ok()) {
            self.max_sessions = n;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.chat_model = model.to_string();
        self.clean_model = model.to_string();
        self
    }

    /// Endpoint with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Get the chat system prompt, using custom or default.
    pub fn get_system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT_CHAT)
    }

    /// Get the clean prompt, using custom or default.
    pub fn get_clean_prompt(&self) -> &str {
        self.clean_prompt.as_deref().unwrap_or(CLEAN_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_base_default() {
        let config = LlmConfig::base_default();
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.chat_model, "mistral:7b");
        assert_eq!(config.clean_model, "mistral:7b");
        assert_eq!(config.timeout_secs, 120);
        assert!(config.temperature.is_none());
        assert!(config.get_system_prompt().starts_with("You are a skeptical"));
        assert!(config.get_clean_prompt().contains("{text}"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: LlmConfig = toml::from_str(
            r#"
            chat_model = "qwen:1.8b"
            max_chunk_chars = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.chat_model, "qwen:1.8b");
        assert_eq!(config.clean_model, "mistral:7b");
        assert_eq!(config.max_chunk_chars, 500);
        assert_ne!(config, LlmConfig::base_default());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("LLM_ENDPOINT", "http://gpu-box:11434"),
            ("LLM_CHAT_MODEL", "qwen:1.8b"),
            ("LLM_TIMEOUT", "300"),
            ("LLM_TEMPERATURE", "0.2"),
            ("LLM_CLEAN_PROMPT", "Fix: {text}"),
            ("LLM_MAX_SESSIONS", "10"),
        ]
        .into_iter()
        .collect();

        let config = LlmConfig::base_default()
            .with_overrides_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.endpoint, "http://gpu-box:11434");
        assert_eq!(config.chat_model, "qwen:1.8b");
        assert_eq!(config.clean_model, "mistral:7b");
        assert_eq!(config.timeout_secs, 300);
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.get_clean_prompt(), "Fix: {text}");
        assert_eq!(config.max_sessions, 10);
        assert_eq!(config.max_chunk_chars, 8000);
    }

    #[test]
    fn test_unparseable_numbers_are_ignored() {
        let env: HashMap<&str, &str> = [
            ("LLM_TIMEOUT", "two minutes"),
            ("LLM_TEMPERATURE", "warm"),
            ("LLM_MAX_CHUNK_CHARS", "-5"),
            ("LLM_MAX_SESSIONS", ""),
        ]
        .into_iter()
        .collect();

        let config = LlmConfig::base_default()
            .with_overrides_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config, LlmConfig::base_default());
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let config = LlmConfig::base_default().with_endpoint("http://gpu-box:11434/");
        assert_eq!(config.base_url(), "http://gpu-box:11434");
    }

    #[test]
    fn test_custom_prompts_win() {
        let mut config = LlmConfig::base_default();
        config.system_prompt = Some("Be brief.".to_string());
        config.clean_prompt = Some("Fix: {text}".to_string());
        assert_eq!(config.get_system_prompt(), "Be brief.");
        assert_eq!(config.get_clean_prompt(), "Fix: {text}");
    }
}
