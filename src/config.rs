//! Assistant configuration.
//!
//! Values are resolved in three layers: built-in defaults, an optional YAML file
//! (`AI_ASSISTANT_CONFIG`, or `assistant.yaml` in the working directory), then
//! environment overrides:
//!
//! - `OLLAMA_HOST` (default `http://localhost:11434`)
//! - `OLLAMA_MODEL` (default `llama3.2:3b`)
//! - `AI_ASSISTANT_TEMPERATURE`, `AI_ASSISTANT_MAX_TOKENS`, `AI_ASSISTANT_MAX_HISTORY`
//! - `AI_ASSISTANT_AUTO_PULL` (`1`/`true` to pull missing models during setup)
//! - `AI_HTTP_TIMEOUT_SECS` (default 120)

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful, knowledgeable assistant. Answer clearly and concisely.";

const CONFIG_FILE_ENV: &str = "AI_ASSISTANT_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "assistant.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Base URL of the Ollama server.
    pub host: String,
    pub model: String,
    pub system_prompt: String,
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens (`num_predict`).
    pub max_tokens: Option<u32>,
    /// Number of history messages kept; user and assistant turns count separately.
    /// `0` disables history. Exchanges are dropped whole, so `1` would keep nothing
    /// and is rejected.
    pub max_history: usize,
    pub timeout_secs: u64,
    /// Pull the model through the server when it is not installed locally.
    pub auto_pull: bool,
    /// Use the streaming chat endpoint for `chat`.
    pub stream: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: Some(0.7),
            max_tokens: None,
            max_history: 20,
            timeout_secs: 120,
            auto_pull: false,
            stream: true,
        }
    }
}

impl AssistantConfig {
    /// Resolve configuration from file and environment.
    pub fn load() -> Result<Self> {
        let mut config = match config_file_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading assistant config");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: AssistantConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_auto_pull(mut self, enable: bool) -> Self {
        self.auto_pull = enable;
        self
    }

    pub fn with_stream(mut self, enable: bool) -> Self {
        self.stream = enable;
        self
    }

    pub fn with_max_history(mut self, n: usize) -> Self {
        self.max_history = n;
        self
    }

    /// Host without trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.host.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.host).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid Ollama host '{}'", self.host),
                ErrorContext::new()
                    .with_field_path("host")
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("unsupported scheme '{}'", parsed.scheme()),
                ErrorContext::new()
                    .with_field_path("host")
                    .with_details("expected http or https")
                    .with_source("config_loader"),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "model name must not be empty",
                ErrorContext::new()
                    .with_field_path("model")
                    .with_source("config_loader"),
            ));
        }
        if self.max_history == 1 {
            return Err(Error::configuration_with_context(
                "max_history must be 0 or at least 2",
                ErrorContext::new()
                    .with_field_path("max_history")
                    .with_details("one message cannot hold a user turn and its reply")
                    .with_source("config_loader"),
            ));
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = env::var("OLLAMA_HOST") {
            self.host = normalize_host(&host);
        }
        if let Ok(model) = env::var("OLLAMA_MODEL") {
            self.model = model;
        }
        if let Some(t) = parse_env::<f32>("AI_ASSISTANT_TEMPERATURE")? {
            self.temperature = Some(t);
        }
        if let Some(n) = parse_env::<u32>("AI_ASSISTANT_MAX_TOKENS")? {
            self.max_tokens = Some(n);
        }
        if let Some(n) = parse_env::<usize>("AI_ASSISTANT_MAX_HISTORY")? {
            self.max_history = n;
        }
        if let Some(n) = parse_env::<u64>("AI_HTTP_TIMEOUT_SECS")? {
            self.timeout_secs = n;
        }
        if let Ok(v) = env::var("AI_ASSISTANT_AUTO_PULL") {
            self.auto_pull = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            Error::configuration_with_context(
                format!("cannot parse {key}"),
                ErrorContext::new()
                    .with_field_path(key)
                    .with_details(format!("got '{raw}'"))
                    .with_source("config_loader"),
            )
        }),
        Err(_) => Ok(None),
    }
}

/// `OLLAMA_HOST` is commonly set as a bare `host:port` (the server's own convention).
fn normalize_host(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_server() {
        let config = AssistantConfig::default();
        assert_eq!(config.base_url(), "http://localhost:11434");
        assert_eq!(config.model, "llama3.2:3b");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_overrides_only_given_fields() {
        let config = AssistantConfig::from_yaml_str(
            "host: http://gpu-box:11434/\nmodel: codellama:7b\nmax_history: 4\n",
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://gpu-box:11434");
        assert_eq!(config.model, "codellama:7b");
        assert_eq!(config.max_history, 4);
        assert_eq!(config.timeout_secs, 120);
        assert!(config.stream);
    }

    #[test]
    fn rejects_invalid_host() {
        let err = AssistantConfig::default()
            .with_host("not a url")
            .validate()
            .unwrap_err();
        assert_eq!(err.context().unwrap().field_path.as_deref(), Some("host"));
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(AssistantConfig::default()
            .with_host("ftp://localhost:11434")
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_empty_model() {
        assert!(AssistantConfig::default().with_model("  ").validate().is_err());
    }

    #[test]
    fn history_bound_must_fit_an_exchange() {
        let err = AssistantConfig::default()
            .with_max_history(1)
            .validate()
            .unwrap_err();
        assert_eq!(
            err.context().unwrap().field_path.as_deref(),
            Some("max_history")
        );
        assert!(AssistantConfig::from_yaml_str("max_history: 1\n").is_err());
        assert!(AssistantConfig::default().with_max_history(0).validate().is_ok());
        assert!(AssistantConfig::default().with_max_history(2).validate().is_ok());
    }

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(normalize_host("127.0.0.1:11434"), "http://127.0.0.1:11434");
        assert_eq!(normalize_host("https://ollama.lan"), "https://ollama.lan");
    }
}
