//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the message channel, the camera session, the lookup
//! backend, the shutdown signal and the settings. Runners feed it messages and
//! render `engine.state`; external consumers subscribe to [`EngineEvent`]s.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use baseconnect_camera::{spawn_camera_session, CameraProvider, CameraSessionConfig, SymbolDecoder};
use baseconnect_core::{CameraEvent, CameraState, DecodeEvent, FacingMode};

use crate::actions::{ActionContext, LookupRetry};
use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::lookup::{EquipmentLookup, EquipmentStore};
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::AppState;

/// Capacity of the camera event channel
const CAMERA_EVENT_CAPACITY: usize = 64;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone, Copy)]
struct StateSnapshot {
    camera_state: CameraState,
    generation: u64,
    facing: FacingMode,
    locked: bool,
    has_handoff: bool,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            camera_state: state.session.camera_state,
            generation: state.session.generation,
            facing: state.session.facing_mode,
            locked: state.session.locked_for_processing,
            has_handoff: state.handoff.is_some(),
        }
    }
}

/// Orchestration engine for the scanner.
pub struct Engine<L = EquipmentStore> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, terminal events).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    /// Loaded settings
    pub settings: Settings,

    actions: ActionContext<L>,

    camera_task: Option<JoinHandle<()>>,
    forwarder_task: Option<JoinHandle<()>>,
    signal_task: Option<JoinHandle<()>>,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<L> Engine<L>
where
    L: EquipmentLookup + Sync + 'static,
{
    /// Create a new Engine.
    ///
    /// Must be called inside a tokio runtime:
    /// - Creates message channel (capacity 256)
    /// - Spawns the camera session and its event forwarder
    /// - Spawns signal handler
    ///
    /// The camera is not requested until [`Engine::start`].
    pub fn new<P>(settings: Settings, provider: P, decoder: Arc<dyn SymbolDecoder>, lookup: L) -> Self
    where
        P: CameraProvider + Sync + 'static,
    {
        let state = AppState::with_settings(&settings);

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let session_config = CameraSessionConfig {
            hints: settings.scanner.decode_hints(),
            ideal_width: settings.scanner.ideal_width,
            ideal_height: settings.scanner.ideal_height,
        };
        let (camera_tx, camera_rx) = mpsc::channel(CAMERA_EVENT_CAPACITY);
        let (camera, camera_task) =
            spawn_camera_session(provider, decoder, session_config, camera_tx);
        let forwarder_task = spawn_event_forwarder(camera_rx, msg_tx.clone());

        let signal_task = signals::spawn_signal_handler(msg_tx.clone());

        let (event_tx, _) = broadcast::channel(256);

        let actions = ActionContext {
            msg_tx: msg_tx.clone(),
            camera,
            lookup: Arc::new(lookup),
            retry: LookupRetry {
                transient_retries: settings.lookup.transient_retries,
                ..LookupRetry::default()
            },
            shutdown_rx: shutdown_rx.clone(),
        };

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            settings,
            actions,
            camera_task: Some(camera_task),
            forwarder_task: Some(forwarder_task),
            signal_task: Some(signal_task),
            event_tx,
        }
    }

    /// Mount the scanner screen: request the camera.
    pub fn start(&mut self) {
        self.process_message(Message::StartScanner);
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Emits EngineEvents based on state changes detected by comparing
    /// before/after snapshots.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);
        process::process_message(&mut self.state, msg, &self.actions);
        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Get a clone of the shutdown receiver for background tasks.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Route requested through "Voir fiche", if any
    pub fn handoff(&self) -> Option<&str> {
        self.state.handoff.as_deref()
    }

    /// Initiate shutdown: stop background tasks, release the camera.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        let _ = self.shutdown_tx.send(true);

        if let Err(e) = self.actions.camera.shutdown() {
            debug!("Camera session already closed: {}", e);
        }

        // Nobody reads camera events any more
        if let Some(task) = self.forwarder_task.take() {
            task.abort();
        }
        if let Some(task) = self.signal_task.take() {
            task.abort();
        }

        if let Some(task) = self.camera_task.take() {
            match tokio::time::timeout(Duration::from_secs(2), task).await {
                Ok(Ok(())) => info!("Camera session cleaned up"),
                Ok(Err(e)) => warn!("Camera session panicked: {}", e),
                Err(_) => warn!("Camera session cleanup timed out"),
            }
        }
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        let session = &self.state.session;

        if pre.camera_state != post.camera_state || pre.generation != post.generation {
            self.emit(EngineEvent::StateChanged {
                generation: post.generation,
                facing: post.facing,
                old_state: pre.camera_state,
                new_state: post.camera_state,
            });
        }

        // Lock taken: a decode was admitted
        if !pre.locked && post.locked {
            self.emit(EngineEvent::Decoded {
                generation: post.generation,
                code: session.scanned_code.clone().unwrap_or_default(),
            });
        }

        // Lock dropped by a result (not by a restart)
        if pre.locked
            && !post.locked
            && pre.generation == post.generation
            && matches!(
                post.camera_state,
                CameraState::Success | CameraState::ScannedError
            )
        {
            self.emit(EngineEvent::LookupCompleted {
                code: session.scanned_code.clone().unwrap_or_default(),
                state: post.camera_state,
                message: session.error_message.clone(),
                equipment: session.equipment.clone().map(Box::new),
            });
        }

        if post.camera_state == CameraState::Error && pre.camera_state != CameraState::Error {
            self.emit(EngineEvent::CameraError {
                message: session.error_message.clone().unwrap_or_default(),
            });
        }

        if !pre.has_handoff && post.has_handoff {
            if let Some(route) = &self.state.handoff {
                self.emit(EngineEvent::Handoff {
                    route: route.clone(),
                });
            }
        }
    }

    /// send() returns Err only if there are no receivers.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

/// Forward camera events into the message channel.
///
/// Steady-state misses are dropped when the channel is full; every other
/// event waits for room.
fn spawn_event_forwarder(
    mut events: mpsc::Receiver<CameraEvent>,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let steady = matches!(
                event,
                CameraEvent::Decode {
                    event: DecodeEvent::NotFound,
                    ..
                }
            );
            let msg = Message::from(event);
            if steady {
                if let Err(mpsc::error::TrySendError::Closed(_)) = msg_tx.try_send(msg) {
                    break;
                }
            } else if msg_tx.send(msg).await.is_err() {
                break;
            }
        }
        debug!("Camera event forwarder stopped");
    })
}
