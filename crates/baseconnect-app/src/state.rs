//! Scanner state (Model in TEA pattern)

use baseconnect_core::{AppPhase, CameraState, DecodeEvent, Equipment, FacingMode, LookupOutcome};

use crate::config::Settings;

/// Shown when the camera cannot be acquired (permission, device, busy)
pub const CAMERA_ERROR_MESSAGE: &str = "Impossible d'accéder à la caméra.";
/// Shown when the scanned code matches no record
pub const UNKNOWN_EQUIPMENT_MESSAGE: &str = "Équipement inconnu en base.";
/// Shown when a lookup fails without a message of its own
pub const NETWORK_ERROR_MESSAGE: &str = "Erreur réseau.";

// ─────────────────────────────────────────────────────────
// Scan session
// ─────────────────────────────────────────────────────────

/// One scanner screen's camera/decode/lookup state.
///
/// `generation` identifies the current camera episode. Every restart bumps
/// it, so events tagged with an older generation can be told apart and
/// dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSession {
    pub facing_mode: FacingMode,
    pub camera_state: CameraState,
    pub error_message: Option<String>,
    pub scanned_code: Option<String>,

    /// Set on decode admission, cleared when the lookup result lands
    pub locked_for_processing: bool,

    /// Record held for the success view
    pub equipment: Option<Equipment>,

    pub generation: u64,

    /// Automatic reacquisitions since the last user-initiated restart
    pub stream_recoveries: u32,

    /// Label of the bound device, when a stream is live
    pub device: Option<String>,
}

impl ScanSession {
    pub fn new(facing_mode: FacingMode) -> Self {
        Self {
            facing_mode,
            camera_state: CameraState::Idle,
            error_message: None,
            scanned_code: None,
            locked_for_processing: false,
            equipment: None,
            generation: 0,
            stream_recoveries: 0,
            device: None,
        }
    }

    /// Start a new camera episode and return its generation.
    ///
    /// Clears everything the previous episode produced, including the lock.
    pub fn restart(&mut self) -> u64 {
        self.generation += 1;
        self.camera_state = CameraState::Loading;
        self.error_message = None;
        self.scanned_code = None;
        self.locked_for_processing = false;
        self.equipment = None;
        self.device = None;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Decide whether a decode event starts a lookup.
    ///
    /// Only a `Decoded` hit from the current generation, while `Active` and
    /// unlocked, is admitted. Admission takes the lock and records the code.
    pub fn admit_decode(&mut self, generation: u64, event: &DecodeEvent) -> Option<String> {
        let DecodeEvent::Decoded(code) = event else {
            return None;
        };
        if !self.is_current(generation)
            || self.camera_state != CameraState::Active
            || self.locked_for_processing
        {
            return None;
        }

        self.locked_for_processing = true;
        self.scanned_code = Some(code.clone());
        Some(code.clone())
    }

    /// `Loading` → `Active`
    pub fn activate(&mut self, device: String) {
        self.camera_state = CameraState::Active;
        self.device = Some(device);
    }

    /// Camera unavailable
    pub fn fail_device(&mut self) {
        self.camera_state = CameraState::Error;
        self.error_message = Some(CAMERA_ERROR_MESSAGE.to_string());
        self.device = None;
    }

    /// Land the lookup result and drop the lock
    pub fn apply_outcome(&mut self, code: String, outcome: LookupOutcome) {
        self.locked_for_processing = false;
        match outcome {
            LookupOutcome::Found(equipment) => {
                self.camera_state = CameraState::Success;
                self.scanned_code = Some(code);
                self.error_message = None;
                self.equipment = Some(*equipment);
            }
            LookupOutcome::NotFound => {
                self.camera_state = CameraState::ScannedError;
                self.scanned_code = Some(code);
                self.error_message = Some(UNKNOWN_EQUIPMENT_MESSAGE.to_string());
            }
            LookupOutcome::Failed(message) => {
                let message = if message.trim().is_empty() {
                    NETWORK_ERROR_MESSAGE.to_string()
                } else {
                    message
                };
                self.camera_state = CameraState::ScannedError;
                self.scanned_code = Some(code);
                self.error_message = Some(message);
            }
        }
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(FacingMode::default())
    }
}

// ─────────────────────────────────────────────────────────
// App state
// ─────────────────────────────────────────────────────────

/// Complete scanner screen state
#[derive(Debug, Clone)]
pub struct AppState {
    pub phase: AppPhase,

    pub session: ScanSession,

    /// Budget for automatic reacquisition after a dead stream
    pub max_stream_recoveries: u32,

    /// Route handed to the navigation layer on exit (`/epis/{id}`)
    pub handoff: Option<String>,

    /// Spinner animation frame
    pub spinner_frame: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            phase: AppPhase::Running,
            session: ScanSession::new(settings.scanner.default_facing),
            max_stream_recoveries: settings.scanner.max_stream_recoveries,
            handoff: None,
            spinner_frame: 0,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_session() -> ScanSession {
        let mut session = ScanSession::default();
        session.restart();
        session.activate("scripted:environment".into());
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = ScanSession::new(FacingMode::User);
        assert_eq!(session.camera_state, CameraState::Idle);
        assert_eq!(session.facing_mode, FacingMode::User);
        assert_eq!(session.generation, 0);
        assert!(!session.locked_for_processing);
    }

    #[test]
    fn test_restart_bumps_generation_and_clears() {
        let mut session = active_session();
        session.admit_decode(1, &DecodeEvent::Decoded("ABC".into()));
        session.apply_outcome("ABC".into(), LookupOutcome::NotFound);
        session.stream_recoveries = 1;

        let generation = session.restart();

        assert_eq!(generation, 2);
        assert_eq!(session.camera_state, CameraState::Loading);
        assert_eq!(session.error_message, None);
        assert_eq!(session.scanned_code, None);
        assert!(!session.locked_for_processing);
        assert_eq!(session.stream_recoveries, 1);
    }

    #[test]
    fn test_admit_decode_takes_lock_once() {
        let mut session = active_session();
        let hit = DecodeEvent::Decoded("1234567890123".into());

        assert_eq!(
            session.admit_decode(1, &hit).as_deref(),
            Some("1234567890123")
        );
        assert!(session.locked_for_processing);
        assert_eq!(session.scanned_code.as_deref(), Some("1234567890123"));

        assert_eq!(session.admit_decode(1, &hit), None);
        assert_eq!(
            session.admit_decode(1, &DecodeEvent::Decoded("OTHER".into())),
            None
        );
    }

    #[test]
    fn test_admit_decode_rejects_stale_generation() {
        let mut session = active_session();
        assert_eq!(
            session.admit_decode(0, &DecodeEvent::Decoded("X".into())),
            None
        );
        assert!(!session.locked_for_processing);
    }

    #[test]
    fn test_admit_decode_requires_active() {
        let mut session = ScanSession::default();
        session.restart();
        assert_eq!(
            session.admit_decode(1, &DecodeEvent::Decoded("X".into())),
            None
        );
    }

    #[test]
    fn test_admit_decode_ignores_misses_and_fatal() {
        let mut session = active_session();
        assert_eq!(session.admit_decode(1, &DecodeEvent::NotFound), None);
        assert_eq!(
            session.admit_decode(1, &DecodeEvent::Fatal("gone".into())),
            None
        );
        assert!(!session.locked_for_processing);
    }

    #[test]
    fn test_failed_outcome_with_empty_message_uses_network_error() {
        let mut session = active_session();
        session.admit_decode(1, &DecodeEvent::Decoded("C".into()));
        session.apply_outcome("C".into(), LookupOutcome::Failed(String::new()));

        assert_eq!(session.camera_state, CameraState::ScannedError);
        assert_eq!(
            session.error_message.as_deref(),
            Some(NETWORK_ERROR_MESSAGE)
        );
        assert_eq!(session.scanned_code.as_deref(), Some("C"));
        assert!(!session.locked_for_processing);
    }

    #[test]
    fn test_fail_device_sets_message() {
        let mut session = ScanSession::default();
        session.restart();
        session.fail_device();
        assert_eq!(session.camera_state, CameraState::Error);
        assert_eq!(session.error_message.as_deref(), Some(CAMERA_ERROR_MESSAGE));
    }

    #[test]
    fn test_app_state_from_settings() {
        let mut settings = Settings::default();
        settings.scanner.default_facing = FacingMode::User;
        settings.scanner.max_stream_recoveries = 5;

        let state = AppState::with_settings(&settings);
        assert_eq!(state.session.facing_mode, FacingMode::User);
        assert_eq!(state.max_stream_recoveries, 5);
        assert!(!state.should_quit());
    }
}
