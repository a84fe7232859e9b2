//! Failure types, one per boundary of the turn pipeline.
//!
//! Each boundary recovers from its own type, so a missing recovery is a
//! type error rather than an unhandled exception.

use thiserror::Error;

/// Raised while assembling the capability catalog. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Duplicate capability name: {0}")]
    DuplicateCapability(String),
}

/// Failure of the HTTP provider behind the reasoning engine.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Non-success status other than 401, 403 and 429, or an unreadable body.
    #[error("HTTP {status} from provider: {body}")]
    Http { status: u16, body: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Provider rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider request timed out: {0}")]
    Timeout(String),

    #[error("Could not reach provider: {0}")]
    Network(String),
}

/// The only failure kind of the reasoning engine adapter.
///
/// Every call site in the agent recovers from this locally with a safe default.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("Oracle call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),
}

/// Failure of a single capability invocation. Recorded inline in the turn result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("{reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

impl ToolError {
    /// Shorthand for an execution failure inside a capability.
    pub fn failed(tool_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool_name: tool_name.into(),
            reason: reason.into(),
        }
    }
}

/// Structured oracle output could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("No JSON object found in response")]
    NoJsonFound,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_shows_status_and_body() {
        let err = ProviderError::Http {
            status: 502,
            body: "upstream unavailable".into(),
        };
        assert_eq!(err.to_string(), "HTTP 502 from provider: upstream unavailable");
    }

    #[test]
    fn oracle_error_wraps_provider_error() {
        let err: OracleError = ProviderError::Network("connection refused".into()).into();
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn tool_error_displays_reason_only() {
        let err = ToolError::failed("calculator", "Cannot divide by zero");
        assert_eq!(err.to_string(), "Cannot divide by zero");
    }

    #[test]
    fn duplicate_capability_names_the_tool() {
        let err = ConfigurationError::DuplicateCapability("get_weather".into());
        assert!(err.to_string().contains("get_weather"));
    }
}
