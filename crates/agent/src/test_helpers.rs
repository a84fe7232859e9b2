//! Shared test helpers for agent unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use syra_core::engine::{ChatReply, ReasoningEngine};
use syra_core::error::{OracleError, ProviderError, ToolError};
use syra_core::tool::{Tool, ToolArgs, ToolInvocationRequest};

/// A reasoning engine that replays scripted results in order.
///
/// Chat and completion queues are independent. An exhausted queue answers
/// with an `OracleError`, so unscripted calls take their fallback path.
#[derive(Default)]
pub struct ScriptedEngine {
    chats: Mutex<VecDeque<Result<ChatReply, OracleError>>>,
    completions: Mutex<VecDeque<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chat(self, reply: ChatReply) -> Self {
        self.chats.lock().unwrap().push_back(Ok(reply));
        self
    }

    pub fn chat_err(self) -> Self {
        self.chats.lock().unwrap().push_back(Err(unavailable()));
        self
    }

    pub fn complete(self, text: &str) -> Self {
        self.completions.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn complete_err(self) -> Self {
        self.completions.lock().unwrap().push_back(Err(unavailable()));
        self
    }

    /// Prompts seen by `complete`, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

fn unavailable() -> OracleError {
    OracleError::Provider(ProviderError::Network("scripted outage".into()))
}

#[async_trait]
impl ReasoningEngine for ScriptedEngine {
    async fn chat(&self, _system: &str, _message: &str) -> Result<ChatReply, OracleError> {
        self.chats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.completions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}

/// Build a tool request from a JSON object literal.
pub fn request(name: &str, args: Value) -> ToolInvocationRequest {
    ToolInvocationRequest::new(name, args.as_object().cloned().unwrap_or_default())
}

/// A capability that returns a fixed value.
pub struct FixedTool {
    pub name: &'static str,
    pub value: Value,
}

#[async_trait]
impl Tool for FixedTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Returns a fixed value"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({"type": "object"})
    }

    async fn execute(&self, _args: ToolArgs) -> Result<Value, ToolError> {
        Ok(self.value.clone())
    }
}

/// A capability that always fails, by error or by panic.
pub struct BrokenTool {
    pub name: &'static str,
    pub panics: bool,
}

#[async_trait]
impl Tool for BrokenTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({"type": "object"})
    }

    async fn execute(&self, _args: ToolArgs) -> Result<Value, ToolError> {
        if self.panics {
            panic!("{} blew up", self.name);
        }
        Err(ToolError::failed(self.name, "service unavailable"))
    }
}
