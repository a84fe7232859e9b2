//! ReasoningEngine: the single seam between the agent and the oracle.
//!
//! Two call shapes:
//! - `chat`: system prompt + user message, with the capability catalog bound
//!   at construction, so the reply may carry zero or more tool requests.
//! - `complete`: a plain text-in, text-out prompt.
//!
//! Any transport or provider failure surfaces as [`OracleError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OracleError;
use crate::tool::ToolInvocationRequest;

/// The oracle's reply to a chat call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Free text, already flattened from any structured content.
    pub text: String,

    /// Capability requests in the order the oracle gave them.
    #[serde(default)]
    pub tool_calls: Vec<ToolInvocationRequest>,
}

impl ChatReply {
    /// A reply carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }
}

#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Chat with capabilities bound.
    async fn chat(&self, system: &str, message: &str) -> Result<ChatReply, OracleError>;

    /// Plain completion, no capabilities.
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_reply_has_no_tool_calls() {
        let reply = ChatReply::text("Hello!");
        assert_eq!(reply.text, "Hello!");
        assert!(reply.tool_calls.is_empty());
    }
}
