//! Diagnostic events published while turns run.
//!
//! Nothing in the turn contract depends on anyone listening: publishing
//! without subscribers drops the event, and a lagging subscriber only loses
//! its own backlog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// The advisory route decision for a turn.
    RouteAnalyzed {
        turn_id: Uuid,
        requires_tool: bool,
        tool_name: Option<String>,
        reasoning: String,
        timestamp: DateTime<Utc>,
    },

    /// One capability invocation finished, successfully or not.
    ToolExecuted {
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A turn reached DONE.
    TurnCompleted {
        turn_id: Uuid,
        tool_count: usize,
        degraded: bool,
        timestamp: DateTime<Utc>,
    },

    /// A failure was absorbed into a fallback reply.
    ErrorOccurred {
        context: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Stable snake_case name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RouteAnalyzed { .. } => "route_analyzed",
            Self::ToolExecuted { .. } => "tool_executed",
            Self::TurnCompleted { .. } => "turn_completed",
            Self::ErrorOccurred { .. } => "error_occurred",
        }
    }
}

/// Multi-consumer fan-out over `tokio::sync::broadcast`.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: DomainEvent) {
        // Err only means nobody is subscribed
        let _ = self.sender.send(Arc::new(event));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
