//! Configuration loading, validation, and management for CodeQuill.
//!
//! Loads configuration from `~/.codequill/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! This crate belongs to the collaborator layer: the core crates never
//! read files or the environment themselves — they are handed plain
//! values extracted from an [`AppConfig`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.codequill/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenRouter API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat-completion endpoint URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Attribution URL sent as the `HTTP-Referer` header
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Attribution name sent as the `X-Title` header
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// The selectable model catalog, in priority order.
    /// Index 0 is the default selection.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Maximum tokens per generated response
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-request network timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Phrases that identify a context-length overflow in an error body.
    /// The upstream provider has no structured code for this condition,
    /// so the match list is configuration, not a hard-wired contract.
    #[serde(default = "default_overflow_markers")]
    pub overflow_markers: Vec<String>,

    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".into()
}
fn default_site_url() -> String {
    "https://github.com/codequill-dev/codequill".into()
}
fn default_site_name() -> String {
    "CodeQuill".into()
}
fn default_models() -> Vec<String> {
    vec![
        "openai/gpt-3.5-turbo".into(),
        "openai/gpt-4".into(),
        "mistralai/mistral-7b-instruct:free".into(),
    ]
}
fn default_max_output_tokens() -> u32 {
    500
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_overflow_markers() -> Vec<String> {
    vec![
        "maximum context length".into(),
        "context length exceeded".into(),
        "context_length_exceeded".into(),
    ]
}

/// Web search backend selection. One backend per deployment.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// "duckduckgo" (unauthenticated) or "serpapi" (requires an API key)
    #[serde(default = "default_search_backend")]
    pub backend: String,

    /// API key for the paid backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serpapi_api_key: Option<String>,
}

fn default_search_backend() -> String {
    "duckduckgo".into()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: default_search_backend(),
            serpapi_api_key: None,
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .field("models", &self.models)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("overflow_markers", &self.overflow_markers)
            .field("search", &self.search)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("backend", &self.backend)
            .field("serpapi_api_key", &redact(&self.serpapi_api_key))
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (`~/.codequill/config.toml`).
    ///
    /// Environment variables override file values:
    /// - `CODEQUILL_API_KEY` / `OPENROUTER_API_KEY` — chat API key
    /// - `SERPAPI_API_KEY` — paid search backend key
    /// - `CODEQUILL_SEARCH_BACKEND` — search backend selection
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("CODEQUILL_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());
        }

        if config.search.serpapi_api_key.is_none() {
            config.search.serpapi_api_key = std::env::var("SERPAPI_API_KEY").ok();
        }

        if let Ok(backend) = std::env::var("CODEQUILL_SEARCH_BACKEND") {
            config.search.backend = backend;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".codequill")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::ValidationError(
                "models must contain at least one entry".into(),
            ));
        }

        if self.max_output_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_output_tokens must be greater than 0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        match self.search.backend.as_str() {
            "duckduckgo" | "serpapi" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown search backend '{other}' (expected 'duckduckgo' or 'serpapi')"
                )));
            }
        }

        Ok(())
    }

    /// Check if a chat API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            site_url: default_site_url(),
            site_name: default_site_name(),
            models: default_models(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: default_timeout_secs(),
            overflow_markers: default_overflow_markers(),
            search: SearchConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.models[0], "openai/gpt-3.5-turbo");
        assert_eq!(config.max_output_tokens, 500);
        assert_eq!(config.search.backend, "duckduckgo");
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.models, config.models);
        assert_eq!(parsed.api_url, config.api_url);
    }

    #[test]
    fn empty_model_list_rejected() {
        let config = AppConfig {
            models: vec![],
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_search_backend_rejected() {
        let mut config = AppConfig::default();
        config.search.backend = "askjeeves".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().max_output_tokens, 500);
    }

    #[test]
    fn partial_config_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_output_tokens = 300").unwrap();
        writeln!(file, "[search]").unwrap();
        writeln!(file, "backend = \"serpapi\"").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.max_output_tokens, 300);
        assert_eq!(config.search.backend, "serpapi");
        // untouched fields come from defaults
        assert_eq!(config.models.len(), 3);
        assert!(config.api_url.contains("openrouter.ai"));
    }

    #[test]
    fn has_api_key_tracks_the_field() {
        let mut config = AppConfig::default();
        assert!(!config.has_api_key());
        config.api_key = Some("sk-or-v1-key".into());
        assert!(config.has_api_key());
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let config = AppConfig {
            api_key: Some("sk-or-v1-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-or-v1-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("openrouter.ai"));
        assert!(toml_str.contains("duckduckgo"));
    }
}
