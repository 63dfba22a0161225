//! Tests for handler module

use super::*;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, CAMERA_ERROR_MESSAGE, UNKNOWN_EQUIPMENT_MESSAGE};
use baseconnect_core::{AppPhase, CameraState, DecodeEvent, Equipment, FacingMode, LookupOutcome};

fn helmet() -> Equipment {
    serde_json::from_str(
        r#"{"id":"42","nom":"Casque F1","etat":"Actif","categorie":"Tête","reference":"F1XF","code_barre":"1234567890123"}"#,
    )
    .unwrap()
}

/// Feed a message and every follow-up message, collecting actions
fn run(state: &mut AppState, msg: Message) -> Vec<UpdateAction> {
    let mut actions = Vec::new();
    let mut next = Some(msg);
    while let Some(msg) = next {
        let result = update(state, msg);
        actions.extend(result.action);
        next = result.message;
    }
    actions
}

fn decoded(generation: u64, code: &str) -> Message {
    Message::Decode {
        generation,
        event: DecodeEvent::Decoded(code.to_string()),
    }
}

fn started(generation: u64) -> Message {
    Message::CameraStarted {
        generation,
        facing: FacingMode::Environment,
        device: "scripted:environment".to_string(),
    }
}

/// Mounted, stream live
fn active_state() -> AppState {
    let mut state = AppState::new();
    run(&mut state, Message::StartScanner);
    run(&mut state, started(1));
    assert_eq!(state.session.camera_state, CameraState::Active);
    state
}

// ─────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────

#[test]
fn test_start_scanner_acquires_camera() {
    let mut state = AppState::new();
    let actions = run(&mut state, Message::StartScanner);

    assert_eq!(state.session.camera_state, CameraState::Loading);
    assert_eq!(
        actions,
        vec![UpdateAction::AcquireCamera {
            generation: 1,
            facing: FacingMode::Environment
        }]
    );
}

#[test]
fn test_camera_started_goes_active() {
    let state = active_state();
    assert_eq!(
        state.session.device.as_deref(),
        Some("scripted:environment")
    );
}

#[test]
fn test_quit_sets_quitting_and_releases() {
    let mut state = active_state();
    let actions = run(&mut state, Message::Quit);

    assert_eq!(state.phase, AppPhase::Quitting);
    assert!(state.should_quit());
    assert_eq!(actions, vec![UpdateAction::ReleaseCamera]);
}

#[test]
fn test_messages_ignored_after_quit() {
    let mut state = active_state();
    run(&mut state, Message::Quit);
    let actions = run(&mut state, decoded(1, "1234567890123"));

    assert!(actions.is_empty());
    assert!(!state.session.locked_for_processing);
}

// ─────────────────────────────────────────────────────────
// Permission denied
// ─────────────────────────────────────────────────────────

#[test]
fn test_permission_denied_goes_to_error_without_active() {
    let mut state = AppState::new();
    let mut seen = vec![state.session.camera_state];

    run(&mut state, Message::StartScanner);
    seen.push(state.session.camera_state);

    let actions = run(
        &mut state,
        Message::CameraFailed {
            generation: 1,
            reason: "permission denied".into(),
        },
    );
    seen.push(state.session.camera_state);

    assert_eq!(
        seen,
        vec![CameraState::Idle, CameraState::Loading, CameraState::Error]
    );
    assert!(!seen.contains(&CameraState::Active));
    assert_eq!(
        state.session.error_message.as_deref(),
        Some(CAMERA_ERROR_MESSAGE)
    );
    assert_eq!(actions, vec![UpdateAction::ReleaseCamera]);
}

#[test]
fn test_retry_from_error_restarts() {
    let mut state = AppState::new();
    run(&mut state, Message::StartScanner);
    run(
        &mut state,
        Message::CameraFailed {
            generation: 1,
            reason: "busy".into(),
        },
    );

    let actions = run(&mut state, Message::Retry);

    assert_eq!(state.session.camera_state, CameraState::Loading);
    assert_eq!(state.session.error_message, None);
    assert_eq!(
        actions,
        vec![UpdateAction::AcquireCamera {
            generation: 2,
            facing: FacingMode::Environment
        }]
    );
}

#[test]
fn test_stale_camera_failure_is_ignored() {
    let mut state = active_state();
    run(&mut state, Message::ToggleFacing);

    let actions = run(
        &mut state,
        Message::CameraFailed {
            generation: 1,
            reason: "old".into(),
        },
    );

    assert!(actions.is_empty());
    assert_eq!(state.session.camera_state, CameraState::Loading);
}

// ─────────────────────────────────────────────────────────
// Decode → lookup
// ─────────────────────────────────────────────────────────

#[test]
fn test_decode_admitted_once_per_episode() {
    let mut state = active_state();

    let first = run(&mut state, decoded(1, "1234567890123"));
    assert_eq!(
        first,
        vec![UpdateAction::LookupEquipment {
            generation: 1,
            code: "1234567890123".into()
        }]
    );
    assert!(state.session.locked_for_processing);

    // The engine keeps sampling while the lookup runs
    for _ in 0..5 {
        assert!(run(&mut state, decoded(1, "1234567890123")).is_empty());
    }
    assert!(run(&mut state, decoded(1, "9999")).is_empty());
    assert_eq!(
        state.session.scanned_code.as_deref(),
        Some("1234567890123")
    );
}

#[test]
fn test_success_scenario() {
    let mut state = active_state();
    run(&mut state, decoded(1, "1234567890123"));

    let actions = run(
        &mut state,
        Message::LookupCompleted {
            generation: 1,
            code: "1234567890123".into(),
            outcome: LookupOutcome::Found(Box::new(helmet())),
        },
    );

    assert_eq!(state.session.camera_state, CameraState::Success);
    assert!(!state.session.locked_for_processing);
    let equipment = state.session.equipment.as_ref().unwrap();
    assert_eq!(equipment.name, "Casque F1");
    assert!(equipment.is_active());
    assert_eq!(actions, vec![UpdateAction::ReleaseCamera]);
}

#[test]
fn test_unknown_code_scenario() {
    let mut state = active_state();
    run(&mut state, decoded(1, "UNKNOWN-CODE"));

    let actions = run(
        &mut state,
        Message::LookupCompleted {
            generation: 1,
            code: "UNKNOWN-CODE".into(),
            outcome: LookupOutcome::NotFound,
        },
    );

    assert_eq!(state.session.camera_state, CameraState::ScannedError);
    assert_eq!(
        state.session.error_message.as_deref(),
        Some(UNKNOWN_EQUIPMENT_MESSAGE)
    );
    assert_eq!(state.session.scanned_code.as_deref(), Some("UNKNOWN-CODE"));
    assert_eq!(actions, vec![UpdateAction::ReleaseCamera]);
}

#[test]
fn test_failed_lookup_shows_error_text() {
    let mut state = active_state();
    run(&mut state, decoded(1, "C-1"));
    run(
        &mut state,
        Message::LookupCompleted {
            generation: 1,
            code: "C-1".into(),
            outcome: LookupOutcome::Failed("connexion refusée".into()),
        },
    );

    assert_eq!(state.session.camera_state, CameraState::ScannedError);
    assert_eq!(
        state.session.error_message.as_deref(),
        Some("connexion refusée")
    );
}

#[test]
fn test_lookup_from_old_generation_is_ignored() {
    let mut state = active_state();
    run(&mut state, decoded(1, "A"));
    run(&mut state, Message::Rescan);
    run(&mut state, started(2));

    let actions = run(
        &mut state,
        Message::LookupCompleted {
            generation: 1,
            code: "A".into(),
            outcome: LookupOutcome::NotFound,
        },
    );

    assert!(actions.is_empty());
    assert_eq!(state.session.camera_state, CameraState::Active);
}

#[test]
fn test_rescan_after_result_clears_everything() {
    let mut state = active_state();
    run(&mut state, decoded(1, "UNKNOWN-CODE"));
    run(
        &mut state,
        Message::LookupCompleted {
            generation: 1,
            code: "UNKNOWN-CODE".into(),
            outcome: LookupOutcome::NotFound,
        },
    );

    let actions = run(&mut state, Message::Rescan);

    assert_eq!(state.session.camera_state, CameraState::Loading);
    assert_eq!(state.session.scanned_code, None);
    assert_eq!(state.session.error_message, None);
    assert_eq!(
        actions,
        vec![UpdateAction::AcquireCamera {
            generation: 2,
            facing: FacingMode::Environment
        }]
    );
}

// ─────────────────────────────────────────────────────────
// Facing toggle
// ─────────────────────────────────────────────────────────

#[test]
fn test_toggle_facing_discards_old_stream_decodes() {
    let mut state = active_state();

    let actions = run(&mut state, Message::ToggleFacing);
    assert_eq!(state.session.facing_mode, FacingMode::User);
    assert_eq!(
        actions,
        vec![UpdateAction::AcquireCamera {
            generation: 2,
            facing: FacingMode::User
        }]
    );

    // Old stream's hit, before and after the new stream starts
    assert!(run(&mut state, decoded(1, "OLD")).is_empty());
    run(
        &mut state,
        Message::CameraStarted {
            generation: 2,
            facing: FacingMode::User,
            device: "front".into(),
        },
    );
    assert!(run(&mut state, decoded(1, "OLD")).is_empty());
    assert!(!state.session.locked_for_processing);

    assert_eq!(
        run(&mut state, decoded(2, "NEW")),
        vec![UpdateAction::LookupEquipment {
            generation: 2,
            code: "NEW".into()
        }]
    );
}

#[test]
fn test_toggle_while_locked_drops_lock() {
    let mut state = active_state();
    run(&mut state, decoded(1, "A"));
    assert!(state.session.locked_for_processing);

    run(&mut state, Message::ToggleFacing);
    assert!(!state.session.locked_for_processing);
    assert_eq!(state.session.scanned_code, None);
}

#[test]
fn test_stale_camera_start_is_ignored() {
    let mut state = active_state();
    run(&mut state, Message::ToggleFacing);
    run(&mut state, started(1));
    assert_eq!(state.session.camera_state, CameraState::Loading);
}

// ─────────────────────────────────────────────────────────
// Stream loss
// ─────────────────────────────────────────────────────────

fn fatal(generation: u64) -> Message {
    Message::Decode {
        generation,
        event: DecodeEvent::Fatal("stream ended".into()),
    }
}

#[test]
fn test_stream_loss_reacquires_within_budget() {
    let mut state = active_state();
    assert_eq!(state.max_stream_recoveries, 2);

    let actions = run(&mut state, fatal(1));
    assert_eq!(state.session.camera_state, CameraState::Loading);
    assert_eq!(state.session.stream_recoveries, 1);
    assert_eq!(
        actions,
        vec![UpdateAction::AcquireCamera {
            generation: 2,
            facing: FacingMode::Environment
        }]
    );

    run(&mut state, started(2));
    run(&mut state, fatal(2));
    assert_eq!(state.session.stream_recoveries, 2);
    run(&mut state, started(3));

    // Budget spent: Loading then Error, no new acquisition
    let actions = run(&mut state, fatal(3));
    assert_eq!(state.session.camera_state, CameraState::Error);
    assert_eq!(actions, vec![UpdateAction::ReleaseCamera]);
}

#[test]
fn test_user_restart_refills_recovery_budget() {
    let mut state = active_state();
    run(&mut state, fatal(1));
    assert_eq!(state.session.stream_recoveries, 1);

    run(&mut state, Message::Retry);
    assert_eq!(state.session.stream_recoveries, 0);
}

#[test]
fn test_stream_loss_while_locked_is_ignored() {
    let mut state = active_state();
    run(&mut state, decoded(1, "A"));

    let actions = run(&mut state, fatal(1));
    assert!(actions.is_empty());
    assert_eq!(state.session.camera_state, CameraState::Active);
    assert!(state.session.locked_for_processing);
}

#[test]
fn test_zero_budget_goes_straight_to_error() {
    let mut state = active_state();
    state.max_stream_recoveries = 0;

    run(&mut state, fatal(1));
    assert_eq!(state.session.camera_state, CameraState::Error);
}

// ─────────────────────────────────────────────────────────
// View record
// ─────────────────────────────────────────────────────────

#[test]
fn test_view_record_hands_off_route() {
    let mut state = active_state();
    run(&mut state, decoded(1, "1234567890123"));
    run(
        &mut state,
        Message::LookupCompleted {
            generation: 1,
            code: "1234567890123".into(),
            outcome: LookupOutcome::Found(Box::new(helmet())),
        },
    );

    let actions = run(&mut state, Message::ViewRecord);

    assert_eq!(state.handoff.as_deref(), Some("/epis/42"));
    assert!(state.should_quit());
    assert_eq!(actions, vec![UpdateAction::ReleaseCamera]);
}

#[test]
fn test_view_record_outside_success_is_noop() {
    let mut state = active_state();
    let actions = run(&mut state, Message::ViewRecord);
    assert!(actions.is_empty());
    assert_eq!(state.handoff, None);
    assert!(!state.should_quit());
}

// ─────────────────────────────────────────────────────────
// Reachability
// ─────────────────────────────────────────────────────────

#[test]
fn test_every_state_is_reachable() {
    let mut reached = std::collections::HashSet::new();
    let mut state = AppState::new();
    reached.insert(state.session.camera_state);

    run(&mut state, Message::StartScanner);
    reached.insert(state.session.camera_state);
    run(
        &mut state,
        Message::CameraFailed {
            generation: 1,
            reason: "denied".into(),
        },
    );
    reached.insert(state.session.camera_state);

    run(&mut state, Message::Retry);
    run(&mut state, started(2));
    reached.insert(state.session.camera_state);

    run(&mut state, decoded(2, "X"));
    run(
        &mut state,
        Message::LookupCompleted {
            generation: 2,
            code: "X".into(),
            outcome: LookupOutcome::NotFound,
        },
    );
    reached.insert(state.session.camera_state);

    run(&mut state, Message::Rescan);
    run(&mut state, started(3));
    run(&mut state, decoded(3, "1234567890123"));
    run(
        &mut state,
        Message::LookupCompleted {
            generation: 3,
            code: "1234567890123".into(),
            outcome: LookupOutcome::Found(Box::new(helmet())),
        },
    );
    reached.insert(state.session.camera_state);

    assert_eq!(reached.len(), 6);
}

// ─────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_keys() {
    let state = active_state();
    for key in [InputKey::Char('q'), InputKey::Esc, InputKey::CharCtrl('c')] {
        assert_eq!(handle_key(&state, key), Some(Message::Quit));
    }
}

#[test]
fn test_toggle_key_in_any_state() {
    let state = AppState::new();
    assert_eq!(
        handle_key(&state, InputKey::Char('f')),
        Some(Message::ToggleFacing)
    );
    assert_eq!(
        handle_key(&active_state(), InputKey::Tab),
        Some(Message::ToggleFacing)
    );
}

#[test]
fn test_enter_follows_camera_state() {
    let mut state = AppState::new();
    assert_eq!(
        handle_key(&state, InputKey::Enter),
        Some(Message::StartScanner)
    );

    state.session.camera_state = CameraState::Error;
    assert_eq!(handle_key(&state, InputKey::Enter), Some(Message::Retry));

    state.session.camera_state = CameraState::ScannedError;
    assert_eq!(handle_key(&state, InputKey::Enter), Some(Message::Rescan));

    state.session.camera_state = CameraState::Success;
    assert_eq!(
        handle_key(&state, InputKey::Enter),
        Some(Message::ViewRecord)
    );
    assert_eq!(
        handle_key(&state, InputKey::Char('s')),
        Some(Message::Rescan)
    );

    state.session.camera_state = CameraState::Active;
    assert_eq!(handle_key(&state, InputKey::Enter), None);
}

#[test]
fn test_key_message_is_forwarded() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::Key(InputKey::Enter));
    assert_eq!(result.message, Some(Message::StartScanner));
    assert!(result.action.is_none());
}
