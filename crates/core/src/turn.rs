//! Per-turn data model.
//!
//! A turn is one request/response cycle for a single utterance. Everything
//! here is created at turn start and dropped once the reply is delivered.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// What the caller hands the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnInput {
    pub input: String,
}

impl TurnInput {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// The final record of a completed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutput {
    pub input: String,
    pub output: String,
    pub tool_results: BTreeMap<String, String>,
}

/// Where the orchestrator is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStage {
    Start,
    Route,
    Execute,
    Done,
}

impl std::fmt::Display for TurnStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::Route => "route",
            Self::Execute => "execute",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Mutable state threaded through one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    pub input: String,
    pub output: String,
    /// Tool name → synthesized text (or error text). Last write wins.
    pub tool_results: BTreeMap<String, String>,
}

impl ConversationState {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: String::new(),
            tool_results: BTreeMap::new(),
        }
    }

    /// Record a tool's text, overwriting an earlier entry with the same name.
    pub fn record(&mut self, tool_name: impl Into<String>, text: impl Into<String>) {
        self.tool_results.insert(tool_name.into(), text.into());
    }

    /// Seed `output` with `text` only if nothing has been written yet.
    pub fn seed_output(&mut self, text: &str) {
        if self.output.trim().is_empty() && !text.trim().is_empty() {
            self.output = text.trim().to_string();
        }
    }

    pub fn has_output(&self) -> bool {
        !self.output.trim().is_empty()
    }

    pub fn finish(self) -> TurnOutput {
        TurnOutput {
            input: self.input,
            output: self.output,
            tool_results: self.tool_results,
        }
    }
}

/// The intent router's advisory verdict. Never gates execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_tool: bool,

    #[serde(default, deserialize_with = "deserialize_tool_name")]
    pub tool_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: String,
}

impl RouteDecision {
    /// "No tool needed", with a note on why analysis fell back.
    pub fn no_tool(reasoning: impl Into<String>) -> Self {
        Self {
            requires_tool: false,
            tool_name: None,
            reasoning: reasoning.into(),
        }
    }
}

/// An explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null`, `""` and the string `"null"` all mean "no tool".
fn deserialize_tool_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null")))
}
