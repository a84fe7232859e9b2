//! The turn pipeline: the heart of Syra.
//!
//! One utterance flows through:
//!
//! 1. **Route**: an advisory check of whether a tool is needed
//! 2. **Chat**: the oracle answers, possibly requesting tools
//! 3. **Invoke**: each requested tool runs in isolation, in oracle order
//! 4. **Synthesize**: each tool result is compressed into a short reply
//!
//! Every oracle call and every tool call may fail independently; the turn
//! always ends with a reply.

pub mod invoker;
pub mod json_extract;
pub mod orchestrator;
pub mod prompts;
pub mod router;
pub mod synthesizer;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use invoker::ToolInvoker;
pub use orchestrator::ConversationOrchestrator;
pub use router::IntentRouter;
pub use synthesizer::ResponseSynthesizer;
