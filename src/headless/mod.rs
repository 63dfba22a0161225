//! Headless mode - NDJSON event output instead of the TUI
//!
//! Every [`EngineEvent`] becomes one JSON line on stdout, tagged with its
//! `event` name and a millisecond timestamp. Commands are read from stdin
//! (see [`runner::parse_command`]).
//!
//! # Example Output
//!
//! ```json
//! {"event":"state_changed","generation":1,"facing":"environment","old_state":"idle","new_state":"loading","timestamp":1704700001000}
//! {"event":"decoded","generation":1,"code":"1234567890123","timestamp":1704700002000}
//! {"event":"lookup_completed","code":"1234567890123","state":"success","message":null,"equipment":{"id":"42","nom":"Casque F1"},"timestamp":1704700002100}
//! ```

pub mod runner;

use std::io::{self, Write};

use baseconnect_app::EngineEvent;
use baseconnect_core::{CameraState, Equipment, FacingMode};
use chrono::Utc;
use serde::Serialize;
use tracing::error;

pub use runner::{parse_command, run_headless, HeadlessOptions};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    StateChanged {
        generation: u64,
        facing: FacingMode,
        old_state: CameraState,
        new_state: CameraState,
        timestamp: i64,
    },

    Decoded {
        generation: u64,
        code: String,
        timestamp: i64,
    },

    LookupCompleted {
        code: String,
        state: CameraState,
        message: Option<String>,
        equipment: Option<Equipment>,
        timestamp: i64,
    },

    Error {
        message: String,
        timestamp: i64,
    },

    Handoff {
        route: String,
        timestamp: i64,
    },

    Shutdown {
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Write this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl From<&EngineEvent> for HeadlessEvent {
    fn from(event: &EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::StateChanged {
                generation,
                facing,
                old_state,
                new_state,
            } => Self::StateChanged {
                generation: *generation,
                facing: *facing,
                old_state: *old_state,
                new_state: *new_state,
                timestamp,
            },
            EngineEvent::Decoded { generation, code } => Self::Decoded {
                generation: *generation,
                code: code.clone(),
                timestamp,
            },
            EngineEvent::LookupCompleted {
                code,
                state,
                message,
                equipment,
            } => Self::LookupCompleted {
                code: code.clone(),
                state: *state,
                message: message.clone(),
                equipment: equipment.as_deref().cloned(),
                timestamp,
            },
            EngineEvent::CameraError { message } => Self::Error {
                message: message.clone(),
                timestamp,
            },
            EngineEvent::Handoff { route } => Self::Handoff {
                route: route.clone(),
                timestamp,
            },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_json(event: &EngineEvent) -> serde_json::Value {
        let json = serde_json::to_string(&HeadlessEvent::from(event)).expect("serialization failed");
        serde_json::from_str(&json).expect("invalid JSON")
    }

    #[test]
    fn test_state_changed_serialization() {
        let value = to_json(&EngineEvent::StateChanged {
            generation: 3,
            facing: FacingMode::User,
            old_state: CameraState::Loading,
            new_state: CameraState::Active,
        });

        assert_eq!(value["event"], "state_changed");
        assert_eq!(value["generation"], 3);
        assert_eq!(value["facing"], "user");
        assert_eq!(value["old_state"], "loading");
        assert_eq!(value["new_state"], "active");
        assert!(value["timestamp"].is_number());
    }

    #[test]
    fn test_lookup_completed_carries_record() {
        let equipment: Equipment =
            serde_json::from_str(r#"{"id":"42","nom":"Casque F1","etat":"Actif"}"#).unwrap();
        let value = to_json(&EngineEvent::LookupCompleted {
            code: "1234567890123".into(),
            state: CameraState::Success,
            message: None,
            equipment: Some(Box::new(equipment)),
        });

        assert_eq!(value["event"], "lookup_completed");
        assert_eq!(value["state"], "success");
        assert_eq!(value["equipment"]["nom"], "Casque F1");
        assert!(value["message"].is_null());
    }

    #[test]
    fn test_not_found_serialization() {
        let value = to_json(&EngineEvent::LookupCompleted {
            code: "UNKNOWN-CODE".into(),
            state: CameraState::ScannedError,
            message: Some("Équipement inconnu en base.".into()),
            equipment: None,
        });

        assert_eq!(value["state"], "scanned_error");
        assert_eq!(value["code"], "UNKNOWN-CODE");
        assert!(value["equipment"].is_null());
    }

    #[test]
    fn test_camera_error_is_error_event() {
        let value = to_json(&EngineEvent::CameraError {
            message: "Permission denied".into(),
        });
        assert_eq!(value["event"], "error");
        assert_eq!(value["message"], "Permission denied");
    }

    #[test]
    fn test_handoff_and_shutdown() {
        let value = to_json(&EngineEvent::Handoff {
            route: "/epis/42".into(),
        });
        assert_eq!(value["event"], "handoff");
        assert_eq!(value["route"], "/epis/42");

        let value = to_json(&EngineEvent::Shutdown);
        assert_eq!(value["event"], "shutdown");
    }
}
