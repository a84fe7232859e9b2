//! Picking the configured backend.
//!
//! Only `default_provider` is ever built. Other `[providers.<name>]` tables
//! are left alone, so a half-written one cannot stop the agent from starting.

use syra_config::AppConfig;
use syra_core::error::ProviderError;

use crate::openai_compat::OpenAiCompatProvider;

/// A backend reachable without an explicit `api_url`.
struct Endpoint {
    name: &'static str,
    base_url: &'static str,
    /// Local servers ignore the bearer token.
    needs_key: bool,
}

const KNOWN_ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        name: "gemini",
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        needs_key: true,
    },
    Endpoint {
        name: "google",
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        needs_key: true,
    },
    Endpoint {
        name: "openai",
        base_url: "https://api.openai.com/v1",
        needs_key: true,
    },
    Endpoint {
        name: "openrouter",
        base_url: "https://openrouter.ai/api/v1",
        needs_key: true,
    },
    Endpoint {
        name: "groq",
        base_url: "https://api.groq.com/openai/v1",
        needs_key: true,
    },
    Endpoint {
        name: "deepseek",
        base_url: "https://api.deepseek.com/v1",
        needs_key: true,
    },
    Endpoint {
        name: "together",
        base_url: "https://api.together.xyz/v1",
        needs_key: true,
    },
    Endpoint {
        name: "ollama",
        base_url: "http://localhost:11434/v1",
        needs_key: false,
    },
    Endpoint {
        name: "vllm",
        base_url: "http://localhost:8000/v1",
        needs_key: false,
    },
    Endpoint {
        name: "llamacpp",
        base_url: "http://localhost:8080/v1",
        needs_key: false,
    },
];

fn endpoint(provider: &str) -> Option<&'static Endpoint> {
    KNOWN_ENDPOINTS.iter().find(|e| e.name == provider)
}

pub fn known_endpoint(provider: &str) -> Option<&'static str> {
    endpoint(provider).map(|e| e.base_url)
}

/// The base URL for the default provider: its table's `api_url`, else the
/// well-known endpoint for its name.
fn default_base_url(config: &AppConfig) -> Result<String, ProviderError> {
    let name = config.default_provider.as_str();
    config
        .providers
        .get(name)
        .and_then(|p| p.api_url.clone())
        .or_else(|| known_endpoint(name).map(String::from))
        .ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "{name}: unknown provider, set providers.{name}.api_url"
            ))
        })
}

/// Build the default provider, preferring its own key over the shared one.
pub fn build_default(config: &AppConfig) -> Result<OpenAiCompatProvider, ProviderError> {
    let name = config.default_provider.as_str();
    let api_key = config
        .providers
        .get(name)
        .and_then(|p| p.api_key.as_ref())
        .or(config.api_key.as_ref())
        .map(|key| key.expose().to_string())
        .unwrap_or_default();

    OpenAiCompatProvider::new(name, default_base_url(config)?, api_key)
}

/// Whether the default provider needs a credential before the agent starts.
///
/// Known local servers and any `api_url` on a loopback host do not.
pub fn requires_api_key(config: &AppConfig) -> bool {
    let name = config.default_provider.as_str();
    let custom_url = config.providers.get(name).and_then(|p| p.api_url.as_deref());
    match custom_url {
        Some(url) => !is_loopback(url),
        None => endpoint(name).is_none_or(|e| e.needs_key),
    }
}

fn is_loopback(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .is_some_and(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]"))
}

/// The default provider's own model if set, else the global default model.
pub fn resolve_model(config: &AppConfig) -> String {
    config
        .providers
        .get(&config.default_provider)
        .and_then(|p| p.default_model.clone())
        .unwrap_or_else(|| config.default_model.clone())
}
