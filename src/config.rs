//! Configuration management for pitchcraft using the prefer crate.
//!
//! Layering, lowest to highest priority: built-in defaults, config file,
//! environment variables, command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmConfig;

/// Default address of the web server, used by both `serve` and the client.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL the CLI uses to reach the web server.
    pub server_url: String,
    /// Address the web server binds to.
    pub bind: String,
    /// Client request timeout in seconds.
    pub request_timeout: u64,
    /// Client timeout for clean requests in seconds. A clean makes one model
    /// call per chunk, so this should cover several model timeouts.
    pub clean_timeout: u64,
    /// Directory holding text documents for clean mode.
    pub texts_dir: PathBuf,
    /// Word that leaves any interactive mode.
    pub exit_word: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: format!("http://{}", DEFAULT_BIND),
            bind: DEFAULT_BIND.to_string(),
            request_timeout: 120,
            clean_timeout: 900,
            texts_dir: PathBuf::from("./sample_texts"),
            exit_word: "bye".to_string(),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the web server (client side).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    /// Bind address of the web server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Client request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Client timeout for clean requests in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_timeout: Option<u64>,
    /// Directory of documents for clean mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texts_dir: Option<String>,
    /// Exit word for interactive modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_word: Option<String>,
    /// LLM configuration.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers pitchcraft config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("pitchcraft").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config file: {}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            // No config file found, use defaults with env overrides
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports TOML, YAML and JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        config.llm = config.llm.with_env_overrides();
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_error = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_error("TOML", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| parse_error("YAML", e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_error("JSON", e.to_string())),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref url) = self.server_url {
            settings.server_url = url.clone();
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(timeout) = self.clean_timeout {
            settings.clean_timeout = timeout;
        }
        if let Some(ref dir) = self.texts_dir {
            settings.texts_dir = self.resolve_path(dir, base_dir);
        }
        if let Some(ref word) = self.exit_word {
            settings.exit_word = word.clone();
        }
    }

    /// Config describing the effective settings, for display.
    pub fn effective(settings: &Settings, llm: &LlmConfig) -> Self {
        Self {
            server_url: Some(settings.server_url.clone()),
            bind: Some(settings.bind.clone()),
            request_timeout: Some(settings.request_timeout),
            clean_timeout: Some(settings.clean_timeout),
            texts_dir: Some(settings.texts_dir.display().to_string()),
            exit_word: Some(settings.exit_word.clone()),
            llm: llm.clone(),
            source_path: None,
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Server URL from the command line.
    pub server_url: Option<String>,
}

/// Apply `PITCH_*` overrides, reading variables through `lookup`.
///
/// Empty values are ignored. A relative `PITCH_TEXTS_DIR` resolves against `cwd`.
fn apply_env_overrides<F>(settings: &mut Settings, config: &Config, cwd: &Path, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

    if let Some(url) = var("PITCH_SERVER_URL") {
        tracing::debug!("Using PITCH_SERVER_URL from environment: {}", url);
        settings.server_url = url;
    }
    if let Some(bind) = var("PITCH_BIND") {
        settings.bind = bind;
    }
    if let Some(dir) = var("PITCH_TEXTS_DIR") {
        settings.texts_dir = config.resolve_path(&dir, cwd);
    }
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
///
/// A config file named explicitly must load; a discovered one that fails is
/// skipped with a warning.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let base_dir = config.base_dir().unwrap_or_else(|| cwd.clone());

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir);

    apply_env_overrides(&mut settings, &config, &cwd, |name| std::env::var(name).ok());

    if let Some(url) = options.server_url {
        settings.server_url = url;
    }

    Ok((settings, config))
}
