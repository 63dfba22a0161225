//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use baseconnect_core::{CameraState, Equipment, FacingMode};

/// Domain events emitted by the Engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Scan Session
    // ─────────────────────────────────────────────────────────
    /// Camera state changed, or a new camera episode started
    StateChanged {
        generation: u64,
        facing: FacingMode,
        old_state: CameraState,
        new_state: CameraState,
    },

    /// A decode was admitted and its lookup started
    Decoded { generation: u64, code: String },

    /// The lookup landed; `state` is `Success` or `ScannedError`
    LookupCompleted {
        code: String,
        state: CameraState,
        message: Option<String>,
        equipment: Option<Box<Equipment>>,
    },

    /// Camera could not be (re)acquired
    CameraError { message: String },

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// The full record was requested; the screen is closing
    Handoff { route: String },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StateChanged { .. } => "state_changed",
            Self::Decoded { .. } => "decoded",
            Self::LookupCompleted { .. } => "lookup_completed",
            Self::CameraError { .. } => "error",
            Self::Handoff { .. } => "handoff",
            Self::Shutdown => "shutdown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_labels() {
        assert_eq!(
            EngineEvent::Handoff {
                route: "/epis/1".into()
            }
            .event_type(),
            "handoff"
        );
        assert_eq!(
            EngineEvent::CameraError {
                message: "x".into()
            }
            .event_type(),
            "error"
        );
        assert_eq!(EngineEvent::Shutdown.event_type(), "shutdown");
    }
}
