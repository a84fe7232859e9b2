//! ResponseSynthesizer: compresses one tool result into a short reply.
//!
//! If the oracle is unavailable or answers with nothing, the normalized
//! result itself is the reply.

use std::sync::Arc;
use syra_core::engine::ReasoningEngine;
use tracing::{debug, warn};

use crate::prompts::summary_prompt;

pub struct ResponseSynthesizer {
    engine: Arc<dyn ReasoningEngine>,
}

impl ResponseSynthesizer {
    pub fn new(engine: Arc<dyn ReasoningEngine>) -> Self {
        Self { engine }
    }

    pub async fn summarize(&self, tool_name: &str, normalized: &str, utterance: &str) -> String {
        let prompt = summary_prompt(tool_name, normalized, utterance);

        match self.engine.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                debug!(tool = %tool_name, "Blank summary, using tool result");
                normalized.to_string()
            }
            Err(e) => {
                warn!(tool = %tool_name, error = %e, "Summary failed, using tool result");
                normalized.to_string()
            }
        }
    }
}
