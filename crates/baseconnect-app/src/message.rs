//! Message types for the scanner (TEA pattern)

use crate::input_key::InputKey;
use baseconnect_core::{CameraEvent, DecodeEvent, FacingMode, LookupOutcome};

/// All possible messages/actions in the scanner
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates (spinner animation)
    Tick,

    /// Screen mounted: bring the camera up
    StartScanner,

    /// Quit the screen, releasing the camera (Ctrl+C, signal handler, `q`)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Camera Session Messages
    // ─────────────────────────────────────────────────────────
    /// Stream acquired, decode loop running
    CameraStarted {
        generation: u64,
        facing: FacingMode,
        device: String,
    },

    /// Stream could not be acquired
    CameraFailed { generation: u64, reason: String },

    /// Stream handed back to the platform
    CameraReleased { generation: u64 },

    /// One decode attempt finished
    Decode { generation: u64, event: DecodeEvent },

    // ─────────────────────────────────────────────────────────
    // Lookup Messages
    // ─────────────────────────────────────────────────────────
    /// Equipment lookup for `code` finished
    LookupCompleted {
        generation: u64,
        code: String,
        outcome: LookupOutcome,
    },

    // ─────────────────────────────────────────────────────────
    // User Actions
    // ─────────────────────────────────────────────────────────
    /// "Réessayer" after a camera error
    Retry,

    /// "Scanner à nouveau" after a result
    Rescan,

    /// Switch between rear and front camera
    ToggleFacing,

    /// "Voir fiche": open the full record of the scanned equipment
    ViewRecord,
}

impl From<CameraEvent> for Message {
    fn from(event: CameraEvent) -> Self {
        match event {
            CameraEvent::Started {
                generation,
                facing,
                device,
            } => Message::CameraStarted {
                generation,
                facing,
                device,
            },
            CameraEvent::AcquisitionFailed { generation, reason } => {
                Message::CameraFailed { generation, reason }
            }
            CameraEvent::Decode { generation, event } => Message::Decode { generation, event },
            CameraEvent::Released { generation } => Message::CameraReleased { generation },
        }
    }
}
