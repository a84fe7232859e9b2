//! # Syra Core
//!
//! Domain types, traits, and error definitions for the Syra assistant engine.
//! This crate has **no framework dependencies**: it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every seam of the turn pipeline is a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping the oracle backend via configuration
//! - Testing the pipeline with scripted engines and tools
//! - A clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;
pub mod engine;
pub mod tool;
pub mod turn;
pub mod normalize;
pub mod event;

// Re-export key types at crate root for ergonomics
pub use error::{ConfigurationError, OracleError, ParseError, ProviderError, ToolError};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use engine::{ChatReply, ReasoningEngine};
pub use tool::{
    CapabilityRegistry, CapabilitySummary, Tool, ToolArgs, ToolInvocationRequest,
    ToolInvocationResult,
};
pub use turn::{ConversationState, RouteDecision, TurnInput, TurnOutput, TurnStage};
pub use normalize::ResultNormalizer;
pub use event::{DomainEvent, EventBus};
