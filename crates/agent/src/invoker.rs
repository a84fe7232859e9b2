//! ToolInvoker: runs one requested capability in isolation.
//!
//! Lookup is by exact name. The capability's future runs inside
//! `catch_unwind`, so an `Err` return and a panic both come back as a
//! [`ToolError`] and never reach sibling tools or the turn.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt;
use syra_core::error::ToolError;
use syra_core::event::{DomainEvent, EventBus};
use syra_core::normalize::ResultNormalizer;
use syra_core::tool::{CapabilityRegistry, ToolInvocationRequest, ToolInvocationResult};
use tracing::{debug, warn};

pub struct ToolInvoker {
    normalizer: ResultNormalizer,
    event_bus: Option<Arc<EventBus>>,
}

impl Default for ToolInvoker {
    fn default() -> Self {
        Self::new(ResultNormalizer::default())
    }
}

impl ToolInvoker {
    pub fn new(normalizer: ResultNormalizer) -> Self {
        Self {
            normalizer,
            event_bus: None,
        }
    }

    /// Publish a `ToolExecuted` event for every invocation.
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub async fn invoke(
        &self,
        request: &ToolInvocationRequest,
        registry: &CapabilityRegistry,
    ) -> Result<ToolInvocationResult, ToolError> {
        let Some(tool) = registry.lookup(&request.name) else {
            warn!(tool = %request.name, "Requested tool is not registered");
            return Err(ToolError::NotFound(request.name.clone()));
        };

        debug!(tool = %request.name, args = ?request.args, "Invoking tool");

        let start = Instant::now();
        let outcome = AssertUnwindSafe(tool.execute(request.args.clone()))
            .catch_unwind()
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(result) => result,
            Err(payload) => Err(ToolError::failed(
                &request.name,
                format!("tool panicked: {}", panic_message(payload.as_ref())),
            )),
        };

        if let Some(bus) = &self.event_bus {
            bus.publish(DomainEvent::ToolExecuted {
                tool_name: request.name.clone(),
                success: result.is_ok(),
                duration_ms,
                timestamp: Utc::now(),
            });
        }

        match result {
            Ok(raw) => {
                let display = self.normalizer.normalize(&raw);
                debug!(tool = %request.name, duration_ms, "Tool succeeded");
                Ok(ToolInvocationResult {
                    name: request.name.clone(),
                    raw,
                    display,
                })
            }
            Err(e) => {
                warn!(tool = %request.name, duration_ms, error = %e, "Tool execution failed");
                Err(e)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{BrokenTool, FixedTool, request};
    use serde_json::json;
    use syra_core::tool::Tool;

    fn registry(tools: Vec<Box<dyn Tool>>) -> CapabilityRegistry {
        CapabilityRegistry::build(tools).unwrap()
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let invoker = ToolInvoker::default();
        let err = invoker
            .invoke(&request("teleport", json!({})), &CapabilityRegistry::empty())
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::NotFound("teleport".into()));
    }

    #[tokio::test]
    async fn structured_result_is_normalized() {
        let registry = registry(vec![Box::new(FixedTool {
            name: "get_current_datetime",
            value: json!({"text": "Date: 2026-10-18, Time: 09:30:00", "signature": "s"}),
        })]);

        let result = ToolInvoker::default()
            .invoke(&request("get_current_datetime", json!({})), &registry)
            .await
            .unwrap();
        assert_eq!(result.display, "Date: 2026-10-18, Time: 09:30:00");
        assert_eq!(result.raw["signature"], "s");
    }

    #[tokio::test]
    async fn tool_error_is_returned_not_raised() {
        let registry = registry(vec![Box::new(BrokenTool {
            name: "flaky",
            panics: false,
        })]);

        let err = ToolInvoker::default()
            .invoke(&request("flaky", json!({})), &registry)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "service unavailable");
    }

    #[tokio::test]
    async fn panic_is_captured() {
        let registry = registry(vec![Box::new(BrokenTool {
            name: "volatile",
            panics: true,
        })]);

        let err = ToolInvoker::default()
            .invoke(&request("volatile", json!({})), &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("volatile blew up"));
    }

    #[tokio::test]
    async fn invocation_publishes_event() {
        let bus = Arc::new(EventBus::new(8));
        let mut rx = bus.subscribe();
        let registry = registry(vec![Box::new(FixedTool {
            name: "calculator",
            value: json!("5 add 3 = 8"),
        })]);

        ToolInvoker::default()
            .with_event_bus(bus.clone())
            .invoke(&request("calculator", json!({})), &registry)
            .await
            .unwrap();

        match rx.recv().await.unwrap().as_ref() {
            DomainEvent::ToolExecuted { tool_name, success, .. } => {
                assert_eq!(tool_name, "calculator");
                assert!(*success);
            }
            other => panic!("Expected ToolExecuted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn custom_deny_list_applies() {
        let registry = registry(vec![Box::new(FixedTool {
            name: "lookup",
            value: json!({"internal": "hidden", "summary": "shown"}),
        })]);
        let invoker = ToolInvoker::new(ResultNormalizer::new(vec!["internal".to_string()]));

        let result = invoker
            .invoke(&request("lookup", json!({})), &registry)
            .await
            .unwrap();
        assert_eq!(result.display, "shown");
    }
}
