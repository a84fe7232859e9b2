//! ConversationOrchestrator: one utterance in, one turn record out.
//!
//! Stages run `START → ROUTE → EXECUTE → DONE`:
//!
//! - **ROUTE** asks the [`IntentRouter`] for an advisory decision. It is
//!   logged and published, then ignored; the stage always moves on.
//! - **EXECUTE** calls `chat` with the system prompt. Each returned tool
//!   request is invoked in oracle order, normalized, summarized and
//!   recorded. The first usable text becomes the turn's output.
//!
//! `invoke` never fails: every failure below it degrades to text.

use std::sync::Arc;

use chrono::Utc;
use syra_config::AppConfig;
use syra_core::engine::ReasoningEngine;
use syra_core::event::{DomainEvent, EventBus};
use syra_core::normalize::ResultNormalizer;
use syra_core::tool::CapabilityRegistry;
use syra_core::turn::{ConversationState, TurnInput, TurnOutput, TurnStage};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::invoker::ToolInvoker;
use crate::prompts::system_prompt;
use crate::router::IntentRouter;
use crate::synthesizer::ResponseSynthesizer;

pub struct ConversationOrchestrator {
    engine: Arc<dyn ReasoningEngine>,
    registry: Arc<CapabilityRegistry>,
    router: IntentRouter,
    invoker: ToolInvoker,
    synthesizer: ResponseSynthesizer,
    system_prompt: String,
    route_analysis: bool,
    clarification_message: String,
    apology_message: String,
    event_bus: Option<Arc<EventBus>>,
}

impl ConversationOrchestrator {
    /// An orchestrator with default settings.
    pub fn new(engine: Arc<dyn ReasoningEngine>, registry: Arc<CapabilityRegistry>) -> Self {
        Self::from_config(engine, registry, &AppConfig::default())
    }

    /// An orchestrator using the assistant name and `[agent]` section of `config`.
    pub fn from_config(
        engine: Arc<dyn ReasoningEngine>,
        registry: Arc<CapabilityRegistry>,
        config: &AppConfig,
    ) -> Self {
        let agent = &config.agent;
        Self {
            router: IntentRouter::new(engine.clone()),
            invoker: ToolInvoker::new(ResultNormalizer::new(agent.result_deny_list.clone())),
            synthesizer: ResponseSynthesizer::new(engine.clone()),
            engine,
            registry,
            system_prompt: system_prompt(&config.assistant_name),
            route_analysis: agent.route_analysis,
            clarification_message: agent.clarification_message.clone(),
            apology_message: agent.apology_message.clone(),
            event_bus: None,
        }
    }

    /// Publish route, tool and turn events to `event_bus`.
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.invoker = self.invoker.with_event_bus(event_bus.clone());
        self.event_bus = Some(event_bus);
        self
    }

    /// Enable or disable the advisory ROUTE stage.
    pub fn with_route_analysis(mut self, enabled: bool) -> Self {
        self.route_analysis = enabled;
        self
    }

    /// The capabilities this orchestrator can invoke.
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Run one turn.
    pub async fn invoke(&self, input: TurnInput) -> TurnOutput {
        self.run(Uuid::new_v4(), input).await
    }

    #[instrument(name = "turn", skip_all, fields(id = %turn_id))]
    async fn run(&self, turn_id: Uuid, input: TurnInput) -> TurnOutput {
        let mut state = ConversationState::new(input.input);
        let mut stage = TurnStage::Start;

        self.advance(&mut stage, TurnStage::Route);
        if self.route_analysis {
            self.route(turn_id, &state.input).await;
        }

        self.advance(&mut stage, TurnStage::Execute);
        let degraded = self.execute(&mut state).await;

        self.advance(&mut stage, TurnStage::Done);
        info!(
            tools = state.tool_results.len(),
            degraded,
            "Turn completed"
        );
        self.publish(DomainEvent::TurnCompleted {
            turn_id,
            tool_count: state.tool_results.len(),
            degraded,
            timestamp: Utc::now(),
        });

        state.finish()
    }

    fn advance(&self, stage: &mut TurnStage, next: TurnStage) {
        debug!(from = %stage, to = %next, "Turn stage");
        *stage = next;
    }

    async fn route(&self, turn_id: Uuid, utterance: &str) {
        let decision = self.router.analyze(utterance, &self.registry).await;
        info!(
            requires_tool = decision.requires_tool,
            tool = decision.tool_name.as_deref().unwrap_or("none"),
            reasoning = %decision.reasoning,
            "Route analysis"
        );
        self.publish(DomainEvent::RouteAnalyzed {
            turn_id,
            requires_tool: decision.requires_tool,
            tool_name: decision.tool_name,
            reasoning: decision.reasoning,
            timestamp: Utc::now(),
        });
    }

    /// The EXECUTE stage. Returns whether the turn degraded.
    async fn execute(&self, state: &mut ConversationState) -> bool {
        let reply = match self.engine.chat(&self.system_prompt, &state.input).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Chat call failed");
                self.publish(DomainEvent::ErrorOccurred {
                    context: "chat".into(),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                state.output = self.apology_message.clone();
                return true;
            }
        };

        let mut degraded = false;
        state.seed_output(&reply.text);

        for request in &reply.tool_calls {
            match self.invoker.invoke(request, &self.registry).await {
                Ok(result) => {
                    let text = self
                        .synthesizer
                        .summarize(&request.name, &result.display, &state.input)
                        .await;
                    state.seed_output(&text);
                    state.record(&request.name, text);
                }
                Err(e) => {
                    degraded = true;
                    state.record(
                        &request.name,
                        format!("Error executing {}: {}", request.name, e),
                    );
                }
            }
        }

        if !state.has_output() {
            state.output = self.clarification_message.clone();
            degraded = true;
        }
        degraded
    }

    fn publish(&self, event: DomainEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}
