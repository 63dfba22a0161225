//! Result presentation: which overlay a scan session shows
//!
//! Pure mapping from [`ScanSession`] to exactly one [`Overlay`]. Renderers
//! (TUI, headless) only ever look at the overlay.

use baseconnect_core::{CameraState, Equipment};

use crate::state::{ScanSession, CAMERA_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE};

/// The single overlay visible for a scan session
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay<'a> {
    /// Nothing started yet
    Idle,
    /// "Démarrage..."
    Loading,
    /// "Erreur Caméra" with a retry action
    DeviceError { message: &'a str },
    /// Live view with the laser guide; `processing` while a lookup runs
    Scanning { processing: bool },
    /// "Résultat" with the raw code and a rescan action
    NotFound {
        message: &'a str,
        code: Option<&'a str>,
    },
    /// Success modal
    Success { equipment: &'a Equipment },
}

impl<'a> Overlay<'a> {
    pub fn from_session(session: &'a ScanSession) -> Self {
        match session.camera_state {
            CameraState::Idle => Overlay::Idle,
            CameraState::Loading => Overlay::Loading,
            CameraState::Error => Overlay::DeviceError {
                message: session
                    .error_message
                    .as_deref()
                    .unwrap_or(CAMERA_ERROR_MESSAGE),
            },
            CameraState::Active => Overlay::Scanning {
                processing: session.locked_for_processing,
            },
            CameraState::ScannedError => Overlay::NotFound {
                message: session
                    .error_message
                    .as_deref()
                    .unwrap_or(NETWORK_ERROR_MESSAGE),
                code: session.scanned_code.as_deref(),
            },
            CameraState::Success => match session.equipment.as_ref() {
                Some(equipment) => Overlay::Success { equipment },
                // Success without a record cannot be built by the handler
                None => Overlay::Idle,
            },
        }
    }

    /// Short stable name, used by the headless output
    pub fn name(&self) -> &'static str {
        match self {
            Overlay::Idle => "idle",
            Overlay::Loading => "loading",
            Overlay::DeviceError { .. } => "device_error",
            Overlay::Scanning { .. } => "scanning",
            Overlay::NotFound { .. } => "not_found",
            Overlay::Success { .. } => "success",
        }
    }
}
