//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;
use baseconnect_core::{AppPhase, CameraState, DecodeEvent, LookupOutcome};
use tracing::{debug, info, trace, warn};

use super::{keys::handle_key, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    if state.should_quit() {
        trace!("Ignoring {:?} while quitting", message);
        return UpdateResult::none();
    }

    match message {
        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        Message::Tick => {
            state.tick();
            UpdateResult::none()
        }

        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::action(UpdateAction::ReleaseCamera)
        }

        // ─────────────────────────────────────────────────────────
        // Restarts
        // ─────────────────────────────────────────────────────────
        Message::StartScanner | Message::Retry | Message::Rescan => restart_scanner(state),

        Message::ToggleFacing => {
            state.session.facing_mode = state.session.facing_mode.toggled();
            info!("Switching to {} camera", state.session.facing_mode);
            restart_scanner(state)
        }

        // ─────────────────────────────────────────────────────────
        // Camera Session Messages
        // ─────────────────────────────────────────────────────────
        Message::CameraStarted {
            generation,
            facing,
            device,
        } => {
            let session = &mut state.session;
            if !session.is_current(generation) || session.camera_state != CameraState::Loading {
                debug!("Ignoring stale camera start (generation {})", generation);
                return UpdateResult::none();
            }
            info!("Camera started: {} ({})", device, facing);
            session.activate(device);
            UpdateResult::none()
        }

        Message::CameraFailed { generation, reason } => {
            let session = &mut state.session;
            if !session.is_current(generation) || session.camera_state != CameraState::Loading {
                debug!("Ignoring stale camera failure (generation {})", generation);
                return UpdateResult::none();
            }
            warn!("Camera unavailable: {}", reason);
            session.fail_device();
            UpdateResult::action(UpdateAction::ReleaseCamera)
        }

        Message::CameraReleased { generation } => {
            if state.session.is_current(generation) {
                state.session.device = None;
            }
            debug!("Camera released (generation {})", generation);
            UpdateResult::none()
        }

        Message::Decode { generation, event } => handle_decode(state, generation, event),

        // ─────────────────────────────────────────────────────────
        // Lookup Messages
        // ─────────────────────────────────────────────────────────
        Message::LookupCompleted {
            generation,
            code,
            outcome,
        } => handle_lookup_completed(state, generation, code, outcome),

        Message::ViewRecord => {
            if state.session.camera_state != CameraState::Success {
                return UpdateResult::none();
            }
            let Some(route) = state.session.equipment.as_ref().map(|e| e.detail_route()) else {
                return UpdateResult::none();
            };
            info!("Opening {}", route);
            state.handoff = Some(route);
            state.phase = AppPhase::Quitting;
            UpdateResult::action(UpdateAction::ReleaseCamera)
        }
    }
}

/// Tear the current episode down and acquire a fresh stream.
///
/// Used for every user-initiated restart, so the recovery budget is refilled.
fn restart_scanner(state: &mut AppState) -> UpdateResult {
    state.session.stream_recoveries = 0;
    let generation = state.session.restart();
    UpdateResult::action(UpdateAction::AcquireCamera {
        generation,
        facing: state.session.facing_mode,
    })
}

fn handle_decode(state: &mut AppState, generation: u64, event: DecodeEvent) -> UpdateResult {
    if let DecodeEvent::Fatal(reason) = &event {
        return handle_stream_lost(state, generation, reason);
    }

    match state.session.admit_decode(generation, &event) {
        Some(code) => {
            info!("Decoded {:?}, looking up equipment", code);
            UpdateResult::action(UpdateAction::LookupEquipment { generation, code })
        }
        None => {
            if event.is_hit() {
                trace!("Decode discarded (generation {})", generation);
            }
            UpdateResult::none()
        }
    }
}

/// A live stream died. Reacquire while the budget lasts, then give up.
fn handle_stream_lost(state: &mut AppState, generation: u64, reason: &str) -> UpdateResult {
    let session = &mut state.session;
    if !session.is_current(generation)
        || session.camera_state != CameraState::Active
        || session.locked_for_processing
    {
        debug!("Ignoring stream loss outside a live scan: {}", reason);
        return UpdateResult::none();
    }

    if session.stream_recoveries < state.max_stream_recoveries {
        session.stream_recoveries += 1;
        warn!(
            "Camera stream lost ({}), reacquiring ({}/{})",
            reason, session.stream_recoveries, state.max_stream_recoveries
        );
        let generation = session.restart();
        return UpdateResult::action(UpdateAction::AcquireCamera {
            generation,
            facing: session.facing_mode,
        });
    }

    warn!("Camera stream lost ({}), recovery budget spent", reason);
    let generation = session.restart();
    UpdateResult::message(Message::CameraFailed {
        generation,
        reason: reason.to_string(),
    })
}

fn handle_lookup_completed(
    state: &mut AppState,
    generation: u64,
    code: String,
    outcome: LookupOutcome,
) -> UpdateResult {
    let session = &mut state.session;
    if !session.is_current(generation) || !session.locked_for_processing {
        debug!("Ignoring stale lookup result for {:?}", code);
        return UpdateResult::none();
    }

    info!("Lookup for {:?}: {}", code, outcome.label());
    session.apply_outcome(code, outcome);
    UpdateResult::action(UpdateAction::ReleaseCamera)
}
