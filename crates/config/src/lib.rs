//! `~/.syra/config.toml`, environment overrides, and startup validation.
//!
//! Every field has a default, so an absent file or a partial one is fine.
//! Credentials are held as [`Secret`] and never show up in `Debug` output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name the assistant introduces itself with
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Shared key; a `[providers.<name>]` key takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<Secret>,

    /// Backend the reasoning engine talks to
    #[serde(default = "default_provider")]
    pub default_provider: String,

    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Max tokens per LLM response (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_tokens: Option<u32>,

    /// Deadline for a single oracle call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Per-backend key, URL and model overrides
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Turn pipeline settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Built-in capability settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_assistant_name() -> String {
    "Syra".into()
}
fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.5-flash-lite".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_request_timeout_secs() -> u64 {
    60
}

/// A credential. Serializes as the plain string, debug-prints as `[REDACTED]`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<Secret>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Run the advisory intent check before each turn
    #[serde(default = "default_true")]
    pub route_analysis: bool,

    /// Fields stripped from structured capability results
    #[serde(default = "default_result_deny_list")]
    pub result_deny_list: Vec<String>,

    /// Reply when a turn produced nothing to say
    #[serde(default = "default_clarification_message")]
    pub clarification_message: String,

    /// Reply when the oracle could not be reached at all
    #[serde(default = "default_apology_message")]
    pub apology_message: String,
}

fn default_true() -> bool {
    true
}
fn default_result_deny_list() -> Vec<String> {
    vec!["signature".into(), "extras".into()]
}
fn default_clarification_message() -> String {
    "I couldn't process that request. Could you rephrase?".into()
}
fn default_apology_message() -> String {
    "Sorry, I ran into a problem while handling that. Please try again.".into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            route_analysis: true,
            result_deny_list: default_result_deny_list(),
            clarification_message: default_clarification_message(),
            apology_message: default_apology_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// OpenWeatherMap key for `get_weather`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweathermap_api_key: Option<Secret>,

    /// Sentences returned by `search_wikipedia`
    #[serde(default = "default_wikipedia_sentences")]
    pub wikipedia_sentences: usize,
}

fn default_wikipedia_sentences() -> usize {
    3
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            openweathermap_api_key: None,
            wikipedia_sentences: default_wikipedia_sentences(),
        }
    }
}

impl AppConfig {
    /// Load `~/.syra/config.toml`, apply environment overrides, then validate.
    ///
    /// A missing `api_key` is filled from `SYRA_API_KEY`, `GEMINI_API_KEY`,
    /// `OPENROUTER_API_KEY` or `OPENAI_API_KEY`, first match wins.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load one file. A file that does not exist yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = API_KEY_VARS
                .iter()
                .find_map(|key| non_empty(key))
                .map(Secret::from);
        }
        if let Some(provider) = non_empty("SYRA_PROVIDER") {
            self.default_provider = provider;
        }
        if let Some(model) = non_empty("SYRA_MODEL") {
            self.default_model = model;
        }
        if self.tools.openweathermap_api_key.is_none() {
            self.tools.openweathermap_api_key =
                non_empty("OPENWEATHERMAP_API_KEY").map(Secret::from);
        }
    }

    pub fn config_dir() -> PathBuf {
        home_dir().join(".syra")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rules = [
            (
                (0.0..=2.0).contains(&self.default_temperature),
                "default_temperature must be between 0.0 and 2.0",
            ),
            (self.request_timeout_secs > 0, "request_timeout_secs must be > 0"),
            (
                !self.agent.clarification_message.trim().is_empty(),
                "agent.clarification_message must not be blank",
            ),
            (
                !self.agent.apology_message.trim().is_empty(),
                "agent.apology_message must not be blank",
            ),
            (
                (1..=10).contains(&self.tools.wikipedia_sentences),
                "tools.wikipedia_sentences must be between 1 and 10",
            ),
        ];

        match rules.iter().find(|(ok, _)| !ok) {
            Some((_, problem)) => Err(ConfigError::Invalid((*problem).to_string())),
            None => Ok(()),
        }
    }

    /// A shared key, or one in the default provider's own table.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// The defaults rendered as TOML, for `syra onboard`.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Checked in order when no `api_key` is configured.
const API_KEY_VARS: &[&str] = &[
    "SYRA_API_KEY",
    "GEMINI_API_KEY",
    "OPENROUTER_API_KEY",
    "OPENAI_API_KEY",
];

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: None,
            request_timeout_secs: default_request_timeout_secs(),
            providers: HashMap::new(),
            agent: AgentConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

fn home_dir() -> PathBuf {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
