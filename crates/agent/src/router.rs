//! IntentRouter: advisory pre-analysis of whether a turn needs a tool.
//!
//! The decision is diagnostic only. Execution re-derives tool use from the
//! chat reply, so nothing here can abort or redirect a turn.

use std::sync::Arc;
use syra_core::engine::ReasoningEngine;
use syra_core::tool::CapabilityRegistry;
use syra_core::turn::RouteDecision;
use tracing::{debug, warn};

use crate::json_extract::extract_object;
use crate::prompts::route_prompt;

/// Reasoning recorded when the oracle's reply held no usable decision.
pub const PARSE_FAILURE_REASONING: &str = "Could not parse tool detection";

/// Reasoning recorded when the oracle could not be reached.
pub const ORACLE_FAILURE_REASONING: &str = "Route analysis unavailable";

pub struct IntentRouter {
    engine: Arc<dyn ReasoningEngine>,
}

impl IntentRouter {
    pub fn new(engine: Arc<dyn ReasoningEngine>) -> Self {
        Self { engine }
    }

    /// Ask the oracle for a route decision. Never fails.
    pub async fn analyze(&self, utterance: &str, registry: &CapabilityRegistry) -> RouteDecision {
        let prompt = route_prompt(&registry.listing(), utterance);

        let reply = match self.engine.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Route analysis call failed");
                return RouteDecision::no_tool(ORACLE_FAILURE_REASONING);
            }
        };

        match extract_object::<RouteDecision>(&reply) {
            Ok(decision) => decision,
            Err(e) => {
                debug!(error = %e, reply = %reply, "Route decision unreadable");
                RouteDecision::no_tool(PARSE_FAILURE_REASONING)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedEngine;

    fn analyze_with(engine: ScriptedEngine) -> (Arc<ScriptedEngine>, IntentRouter) {
        let engine = Arc::new(engine);
        (engine.clone(), IntentRouter::new(engine))
    }

    #[tokio::test]
    async fn well_formed_decision_is_returned_exactly() {
        let (_, router) = analyze_with(ScriptedEngine::new().complete(
            r#"{"requires_tool": true, "tool_name": "get_weather", "reasoning": "x"}"#,
        ));

        let decision = router.analyze("weather in Delhi", &CapabilityRegistry::empty()).await;
        assert_eq!(
            decision,
            RouteDecision {
                requires_tool: true,
                tool_name: Some("get_weather".into()),
                reasoning: "x".into(),
            }
        );
    }

    #[tokio::test]
    async fn null_reasoning_keeps_the_decision() {
        let (_, router) = analyze_with(ScriptedEngine::new().complete(
            r#"{"requires_tool": true, "tool_name": "get_weather", "reasoning": null}"#,
        ));

        let decision = router.analyze("weather in Delhi", &CapabilityRegistry::empty()).await;
        assert!(decision.requires_tool);
        assert_eq!(decision.tool_name.as_deref(), Some("get_weather"));
        assert_eq!(decision.reasoning, "");
    }

    #[tokio::test]
    async fn decision_embedded_in_prose_is_extracted() {
        let (_, router) = analyze_with(
            ScriptedEngine::new().complete(r#"Let me think. {"requires_tool": false} That's it."#),
        );

        let decision = router.analyze("hello", &CapabilityRegistry::empty()).await;
        assert!(!decision.requires_tool);
        assert_eq!(decision.tool_name, None);
    }

    #[tokio::test]
    async fn unreadable_reply_defaults_to_no_tool() {
        let (_, router) = analyze_with(ScriptedEngine::new().complete("no idea, sorry"));

        let decision = router.analyze("hello", &CapabilityRegistry::empty()).await;
        assert_eq!(decision, RouteDecision::no_tool(PARSE_FAILURE_REASONING));
    }

    #[tokio::test]
    async fn oracle_failure_defaults_to_no_tool() {
        let (_, router) = analyze_with(ScriptedEngine::new().complete_err());

        let decision = router.analyze("hello", &CapabilityRegistry::empty()).await;
        assert_eq!(decision, RouteDecision::no_tool(ORACLE_FAILURE_REASONING));
    }

    #[tokio::test]
    async fn prompt_lists_registered_capabilities() {
        let registry = syra_tools::default_registry(&Default::default()).unwrap();
        let (engine, router) = analyze_with(ScriptedEngine::new().complete("{}"));

        router.analyze("what time is it", &registry).await;
        let prompt = &engine.prompts()[0];
        assert!(prompt.contains("get_current_datetime"));
        assert!(prompt.contains("search_wikipedia"));
    }
}
