//! Configuration loading and validation for WriteBuddy.
//!
//! Loads configuration from `~/.writebuddy/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to `~/.writebuddy/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider credential (can be supplied via environment instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider endpoint configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Model tiers and token budgets
    #[serde(default)]
    pub models: ModelsConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Word-association (synonym) service configuration
    #[serde(default)]
    pub thesaurus: ThesaurusConfig,
}

/// Where chat completions are sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-attempt timeout for outbound provider calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// The two model tiers of the degradation ladder and their budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Top-tier model, tried first for ladder operations
    #[serde(default = "default_primary")]
    pub primary: String,

    /// Context window of the primary model, in tokens
    #[serde(default = "default_primary_window")]
    pub primary_context_window: usize,

    /// Cheaper model retried once when the primary fails
    #[serde(default = "default_fallback")]
    pub fallback: String,

    /// Context window of the fallback model, in tokens
    #[serde(default = "default_fallback_window")]
    pub fallback_context_window: usize,

    /// Tokens reserved for the model's reply when budgeting input
    #[serde(default = "default_response_reserve")]
    pub response_reserve_tokens: usize,
}

fn default_primary() -> String {
    "gpt-4".into()
}
fn default_primary_window() -> usize {
    8192
}
fn default_fallback() -> String {
    "gpt-3.5-turbo".into()
}
fn default_fallback_window() -> usize {
    4096
}
fn default_response_reserve() -> usize {
    512
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            primary_context_window: default_primary_window(),
            fallback: default_fallback(),
            fallback_context_window: default_fallback_window(),
            response_reserve_tokens: default_response_reserve(),
        }
    }
}

/// HTTP gateway settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Code required by POST /keys; issuance is disabled when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_code: Option<String>,

    /// Seed allow-list of client API keys
    #[serde(default)]
    pub api_keys: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            admin_code: None,
            api_keys: Vec::new(),
        }
    }
}

/// Third-party word-association service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThesaurusConfig {
    #[serde(default = "default_thesaurus_url")]
    pub base_url: String,

    /// Maximum synonyms returned to clients
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_thesaurus_url() -> String {
    "https://api.datamuse.com".into()
}
fn default_max_results() -> usize {
    10
}

impl Default for ThesaurusConfig {
    fn default() -> Self {
        Self {
            base_url: default_thesaurus_url(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: ProviderConfig::default(),
            models: ModelsConfig::default(),
            gateway: GatewayConfig::default(),
            thesaurus: ThesaurusConfig::default(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("models", &self.models)
            .field("gateway", &self.gateway)
            .field("thesaurus", &self.thesaurus)
            .finish()
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("admin_code", &redact(&self.admin_code))
            .field("api_keys", &format_args!("[{} keys]", self.api_keys.len()))
            .finish()
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Load config from the default location with environment overrides.
    ///
    /// Env vars win over the file: `WRITEBUDDY_API_KEY` (or `OPENAI_API_KEY`)
    /// for the provider credential, `WRITEBUDDY_MODEL` for the primary
    /// model, `WRITEBUDDY_PORT` for the gateway port.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("WRITEBUDDY_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("WRITEBUDDY_MODEL") {
            config.models.primary = model;
        }

        if let Ok(port) = std::env::var("WRITEBUDDY_PORT")
            && let Ok(port) = port.parse()
        {
            config.gateway.port = port;
        }

        Ok(config)
    }

    /// Load config from a specific path. Missing file means defaults.
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

    /// Validate settings that would otherwise fail deep inside a request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.primary.is_empty() || self.models.fallback.is_empty() {
            return Err(ConfigError::Invalid("model names must not be empty".into()));
        }
        if self.models.primary_context_window <= self.models.response_reserve_tokens {
            return Err(ConfigError::Invalid(
                "primary context window must exceed the response reserve".into(),
            ));
        }
        if self.models.fallback_context_window <= self.models.response_reserve_tokens {
            return Err(ConfigError::Invalid(
                "fallback context window must exceed the response reserve".into(),
            ));
        }
        if self.provider.timeout_secs == 0 || self.thesaurus.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be non-zero".into()));
        }
        Ok(())
    }

    /// The directory holding config.toml (`~/.writebuddy`).
    pub fn config_dir() -> PathBuf {
        home_dir().join(".writebuddy")
    }

    /// Context window for a given ladder tier.
    pub fn context_window(&self, primary: bool) -> usize {
        if primary {
            self.models.primary_context_window
        } else {
            self.models.fallback_context_window
        }
    }
}

fn home_dir() -> PathBuf {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
    }
}
