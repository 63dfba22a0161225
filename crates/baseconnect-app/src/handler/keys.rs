//! Key event handlers for the scanner screen

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::AppState;
use baseconnect_core::CameraState;

/// Convert key events to messages based on the current camera state
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::CharCtrl('c') | InputKey::Char('q') | InputKey::Esc => {
            return Some(Message::Quit)
        }
        InputKey::Char('f') | InputKey::Tab => return Some(Message::ToggleFacing),
        _ => {}
    }

    match state.session.camera_state {
        CameraState::Idle => handle_key_idle(key),
        CameraState::Error => handle_key_error(key),
        CameraState::ScannedError => handle_key_scanned_error(key),
        CameraState::Success => handle_key_success(key),
        CameraState::Loading | CameraState::Active => None,
    }
}

fn handle_key_idle(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Char('s') => Some(Message::StartScanner),
        _ => None,
    }
}

/// "Réessayer"
fn handle_key_error(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Char('r') => Some(Message::Retry),
        _ => None,
    }
}

/// "Scanner à nouveau"
fn handle_key_scanned_error(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Char('s' | 'r') => Some(Message::Rescan),
        _ => None,
    }
}

/// "Scanner" / "Voir fiche"
fn handle_key_success(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('s' | 'r') => Some(Message::Rescan),
        InputKey::Enter | InputKey::Char('v') => Some(Message::ViewRecord),
        _ => None,
    }
}
