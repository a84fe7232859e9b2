//! `ProviderEngine`: the ReasoningEngine adapter over an HTTP provider.
//!
//! Capability definitions are bound once at construction. Each `chat` sends
//! them along so the oracle may request any number of tools per reply.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use syra_core::engine::{ChatReply, ReasoningEngine};
use syra_core::error::{OracleError, ProviderError};
use syra_core::message::{Message, MessageToolCall};
use syra_core::provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
use syra_core::tool::{ToolArgs, ToolInvocationRequest};
use tracing::{debug, warn};

pub struct ProviderEngine {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Vec<ToolDefinition>,
    timeout: Option<Duration>,
}

impl ProviderEngine {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            tools,
            timeout: None,
        }
    }

    /// Build the engine for the configured default provider and model.
    pub fn from_config(
        config: &syra_config::AppConfig,
        tools: Vec<ToolDefinition>,
    ) -> Result<Self, ProviderError> {
        let provider = Arc::new(crate::router::build_default(config)?);

        let mut engine = Self::new(provider, crate::router::resolve_model(config), tools)
            .with_temperature(config.default_temperature)
            .with_timeout(Duration::from_secs(config.request_timeout_secs));
        if let Some(max_tokens) = config.default_max_tokens {
            engine = engine.with_max_tokens(max_tokens);
        }
        Ok(engine)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Fail any single oracle call that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn request(&self, messages: Vec<Message>, tools: Vec<ToolDefinition>) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools,
        }
    }

    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, OracleError> {
        let call = self.provider.complete(request);
        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result.map_err(OracleError::from),
                Err(_) => Err(OracleError::Timeout {
                    timeout_secs: limit.as_secs(),
                }),
            },
            None => call.await.map_err(OracleError::from),
        }
    }
}

/// Parse a tool call's argument string. Anything but a JSON object yields no arguments.
fn parse_arguments(call: &MessageToolCall) -> ToolArgs {
    if call.arguments.trim().is_empty() {
        return ToolArgs::new();
    }
    match serde_json::from_str::<serde_json::Value>(&call.arguments) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(other) => {
            warn!(tool = %call.name, arguments = %other, "Tool arguments are not an object");
            ToolArgs::new()
        }
        Err(e) => {
            warn!(tool = %call.name, error = %e, "Malformed tool arguments");
            ToolArgs::new()
        }
    }
}

#[async_trait]
impl ReasoningEngine for ProviderEngine {
    async fn chat(&self, system: &str, message: &str) -> Result<ChatReply, OracleError> {
        let request = self.request(
            vec![Message::system(system), Message::user(message)],
            self.tools.clone(),
        );

        let response = self.send(request).await?;
        let tool_calls: Vec<ToolInvocationRequest> = response
            .message
            .tool_calls
            .iter()
            .map(|call| ToolInvocationRequest::new(call.name.clone(), parse_arguments(call)))
            .collect();

        debug!(
            provider = %self.provider.name(),
            model = %response.model,
            tool_calls = tool_calls.len(),
            total_tokens = response.usage.map(|u| u.total_tokens),
            "Chat reply received"
        );

        Ok(ChatReply {
            text: response.message.content,
            tool_calls,
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let request = self.request(vec![Message::user(prompt)], Vec::new());
        let response = self.send(request).await?;
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use syra_core::message::Role;

    /// Replays queued results and records every request it sees.
    struct ScriptedProvider {
        replies: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
        seen: Mutex<Vec<ProviderRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new(vec![Ok(text_response("late"))])
            }
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            self.seen.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn text_response(text: &str) -> ProviderResponse {
        ProviderResponse {
            message: Message::assistant(text),
            usage: None,
            model: "mock-model".into(),
        }
    }

    fn tool_response(calls: &[(&str, &str)]) -> ProviderResponse {
        let calls = calls
            .iter()
            .enumerate()
            .map(|(i, (name, args))| MessageToolCall {
                id: format!("call_{i}"),
                name: name.to_string(),
                arguments: args.to_string(),
            })
            .collect();
        ProviderResponse {
            message: Message::assistant("").with_tool_calls(calls),
            usage: None,
            model: "mock-model".into(),
        }
    }

    fn definitions() -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: "calculator".into(),
            description: "Basic arithmetic".into(),
            parameters: serde_json::json!({"type": "object"}),
        }]
    }

    #[tokio::test]
    async fn chat_binds_tools_and_sends_system_then_user() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(text_response("Hello!"))]));
        let engine = ProviderEngine::new(provider.clone(), "gemini-2.5-flash-lite", definitions());

        let reply = engine.chat("be brief", "hi").await.unwrap();
        assert_eq!(reply, ChatReply::text("Hello!"));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].tools.len(), 1);
        assert_eq!(seen[0].messages[0].role, Role::System);
        assert_eq!(seen[0].messages[1].content, "hi");
    }

    #[tokio::test]
    async fn chat_parses_tool_arguments_in_order() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(tool_response(&[
            ("calculator", r#"{"operation":"add","num1":5,"num2":3}"#),
            ("get_current_datetime", ""),
        ]))]));
        let engine = ProviderEngine::new(provider, "m", definitions());

        let reply = engine.chat("sys", "5 plus 3, and the time").await.unwrap();
        assert_eq!(reply.tool_calls.len(), 2);
        assert_eq!(reply.tool_calls[0].name, "calculator");
        assert_eq!(reply.tool_calls[0].args["num1"], 5);
        assert_eq!(reply.tool_calls[1].name, "get_current_datetime");
        assert!(reply.tool_calls[1].args.is_empty());
    }

    #[tokio::test]
    async fn malformed_arguments_become_empty() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(tool_response(&[
            ("calculator", "{not json"),
            ("calculator", "[1, 2]"),
        ]))]));
        let engine = ProviderEngine::new(provider, "m", definitions());

        let reply = engine.chat("sys", "math").await.unwrap();
        assert!(reply.tool_calls.iter().all(|c| c.args.is_empty()));
    }

    #[tokio::test]
    async fn complete_sends_no_tools() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(text_response("Summary."))]));
        let engine = ProviderEngine::new(provider.clone(), "m", definitions()).with_max_tokens(64);

        let text = engine.complete("summarize").await.unwrap();
        assert_eq!(text, "Summary.");

        let seen = provider.seen.lock().unwrap();
        assert!(seen[0].tools.is_empty());
        assert_eq!(seen[0].max_tokens, Some(64));
        assert_eq!(seen[0].messages.len(), 1);
    }

    #[tokio::test]
    async fn provider_failure_becomes_oracle_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::RateLimited {
            retry_after_secs: 5,
        })]));
        let engine = ProviderEngine::new(provider, "m", Vec::new());

        let err = engine.complete("anything").await.unwrap_err();
        assert!(matches!(
            err,
            OracleError::Provider(ProviderError::RateLimited { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_deadline_becomes_oracle_timeout() {
        let provider = Arc::new(ScriptedProvider::slow(Duration::from_secs(30)));
        let engine =
            ProviderEngine::new(provider, "m", Vec::new()).with_timeout(Duration::from_secs(2));

        let err = engine.chat("sys", "hello").await.unwrap_err();
        assert!(matches!(err, OracleError::Timeout { timeout_secs: 2 }));
    }

    #[test]
    fn from_default_config_uses_gemini() {
        let engine =
            ProviderEngine::from_config(&syra_config::AppConfig::default(), definitions()).unwrap();
        assert_eq!(engine.provider_name(), "gemini");
        assert_eq!(engine.model(), "gemini-2.5-flash-lite");
    }
}
