//! OpenAI-compatible chat completions client.
//!
//! Gemini (through its OpenAI endpoint), OpenAI, OpenRouter, Ollama, Groq and
//! most other hosted or local backends accept the same `/chat/completions`
//! request with function-calling tools.

use async_trait::async_trait;
use std::time::Duration;
use syra_core::error::ProviderError;
use syra_core::provider::{Provider, ProviderRequest, ProviderResponse};
use tracing::{debug, warn};

/// Transport ceiling. Per-call deadlines are the engine's job.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Map a non-success HTTP status to a provider error.
fn status_error(status: u16, body: String) -> ProviderError {
    match status {
        429 => ProviderError::RateLimited {
            retry_after_secs: 5,
        },
        401 | 403 => ProviderError::Unauthorized(format!("status {status}")),
        _ => ProviderError::Http { status, body },
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let body = wire::ChatRequest::from_request(&request);
        debug!(
            provider = %self.name,
            model = %request.model,
            tools = request.tools.len(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                provider = %self.name,
                status = status.as_u16(),
                body = %text,
                "Provider returned error"
            );
            return Err(status_error(status.as_u16(), text));
        }

        let parsed: wire::ChatResponse =
            response.json().await.map_err(|e| ProviderError::Http {
                status: status.as_u16(),
                body: format!("unreadable completion body: {e}"),
            })?;

        parsed.into_provider_response()
    }
}

/// Request and response bodies of the `/chat/completions` endpoint.
mod wire {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;
    use syra_core::error::ProviderError;
    use syra_core::message::{Message, MessageToolCall};
    use syra_core::normalize::ResultNormalizer;
    use syra_core::provider::{ProviderRequest, ProviderResponse, Usage};

    #[derive(Debug, Serialize)]
    pub(super) struct ChatRequest<'a> {
        model: &'a str,
        messages: Vec<ChatMessage<'a>>,
        temperature: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_tokens: Option<u32>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tools: Vec<FunctionTool<'a>>,
        stream: bool,
    }

    #[derive(Debug, Serialize)]
    pub(super) struct ChatMessage<'a> {
        role: &'static str,
        content: &'a str,
    }

    #[derive(Debug, Serialize)]
    pub(super) struct FunctionTool<'a> {
        r#type: &'static str,
        function: FunctionSpec<'a>,
    }

    #[derive(Debug, Serialize)]
    pub(super) struct FunctionSpec<'a> {
        name: &'a str,
        description: &'a str,
        parameters: &'a Value,
    }

    impl<'a> ChatRequest<'a> {
        pub(super) fn from_request(request: &'a ProviderRequest) -> Self {
            Self {
                model: &request.model,
                messages: request
                    .messages
                    .iter()
                    .map(|m| ChatMessage {
                        role: m.role.as_str(),
                        content: &m.content,
                    })
                    .collect(),
                temperature: request.temperature,
                max_tokens: request.max_tokens,
                tools: request
                    .tools
                    .iter()
                    .map(|t| FunctionTool {
                        r#type: "function",
                        function: FunctionSpec {
                            name: &t.name,
                            description: &t.description,
                            parameters: &t.parameters,
                        },
                    })
                    .collect(),
                stream: false,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct ChatResponse {
        #[serde(default)]
        model: Option<String>,
        choices: Vec<Choice>,
        #[serde(default)]
        usage: Option<Usage>,
    }

    #[derive(Debug, Deserialize)]
    struct Choice {
        message: ReplyMessage,
    }

    #[derive(Debug, Deserialize)]
    struct ReplyMessage {
        /// A string, a list of typed parts, or null when only tools were called.
        #[serde(default)]
        content: Option<Value>,
        #[serde(default)]
        tool_calls: Option<Vec<ReplyToolCall>>,
    }

    #[derive(Debug, Deserialize)]
    struct ReplyToolCall {
        #[serde(default)]
        id: String,
        function: ReplyFunction,
    }

    #[derive(Debug, Deserialize)]
    struct ReplyFunction {
        name: String,
        #[serde(default)]
        arguments: String,
    }

    impl ChatResponse {
        pub(super) fn into_provider_response(self) -> Result<ProviderResponse, ProviderError> {
            let choice = self
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::Http {
                    status: 200,
                    body: "completion had no choices".into(),
                })?;

            let text = choice
                .message
                .content
                .map(|content| ResultNormalizer::default().normalize(&content))
                .unwrap_or_default();

            let tool_calls = choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(|call| MessageToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect();

            Ok(ProviderResponse {
                message: Message::assistant(text).with_tool_calls(tool_calls),
                usage: self.usage,
                model: self.model.unwrap_or_default(),
            })
        }
    }
}
