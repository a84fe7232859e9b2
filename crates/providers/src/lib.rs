//! LLM backends for Syra.
//!
//! Every backend speaks the OpenAI-compatible chat API. [`router`] builds the
//! configured one, and [`ProviderEngine`] adapts it to the agent's
//! `ReasoningEngine` seam.

pub mod engine;
pub mod openai_compat;
pub mod router;

pub use engine::ProviderEngine;
pub use openai_compat::OpenAiCompatProvider;
