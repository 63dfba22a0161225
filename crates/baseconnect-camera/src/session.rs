//! Camera session actor
//!
//! One task owns the provider, the decoder engine, and at most one bound
//! stream. Commands from the app are applied strictly in order, which gives
//! the ordering guarantee the rest of the pipeline relies on: a stream is
//! released (and its decode loop has exited) before the next one is
//! requested.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use baseconnect_core::prelude::*;
use baseconnect_core::types::{IDEAL_HEIGHT, IDEAL_WIDTH};
use baseconnect_core::{CameraEvent, DecodeHints, FacingMode, StreamConstraints};

use crate::decoder::{DecoderEngine, SymbolDecoder};
use crate::provider::{CameraProvider, CameraStream};

/// Static settings for a camera session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSessionConfig {
    pub hints: DecodeHints,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraSessionConfig {
    fn default() -> Self {
        Self {
            hints: DecodeHints::default(),
            ideal_width: IDEAL_WIDTH,
            ideal_height: IDEAL_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CameraCommand {
    Acquire { generation: u64, facing: FacingMode },
    Release,
    Shutdown,
}

/// Cloneable handle to a running camera session.
///
/// Commands are queued without waiting, in call order. Dropping every handle
/// (or calling [`CameraHandle::shutdown`]) ends the session after releasing
/// the camera.
#[derive(Debug, Clone)]
pub struct CameraHandle {
    tx: mpsc::UnboundedSender<CameraCommand>,
}

impl CameraHandle {
    /// Release whatever is bound, then acquire a stream for `facing` and start
    /// decoding it under `generation`.
    pub fn acquire(&self, generation: u64, facing: FacingMode) -> Result<()> {
        self.send(CameraCommand::Acquire { generation, facing })
    }

    /// Stop decoding and hand the stream back
    pub fn release(&self) -> Result<()> {
        self.send(CameraCommand::Release)
    }

    /// Release and end the session task
    pub fn shutdown(&self) -> Result<()> {
        self.send(CameraCommand::Shutdown)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, command: CameraCommand) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| Error::channel_send("camera session closed"))
    }
}

/// Spawn the session actor.
///
/// Every [`CameraEvent`] it produces goes to `events`. The returned
/// `JoinHandle` resolves once the session is shut down (or all handles are
/// dropped) and the camera has been released.
pub fn spawn_camera_session<P>(
    provider: P,
    decoder: Arc<dyn SymbolDecoder>,
    config: CameraSessionConfig,
    events: mpsc::Sender<CameraEvent>,
) -> (CameraHandle, JoinHandle<()>)
where
    P: CameraProvider + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let session = CameraSession {
        provider,
        engine: DecoderEngine::configure(config.hints.clone(), decoder),
        config,
        events,
    };
    let task = tokio::spawn(session.run(rx));
    (CameraHandle { tx }, task)
}

struct CameraSession<P> {
    provider: P,
    engine: DecoderEngine,
    config: CameraSessionConfig,
    events: mpsc::Sender<CameraEvent>,
}

impl<P> CameraSession<P>
where
    P: CameraProvider + Sync + 'static,
{
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<CameraCommand>) {
        debug!("Camera session started");

        while let Some(command) = rx.recv().await {
            match command {
                CameraCommand::Acquire { generation, facing } => {
                    self.acquire(generation, facing).await
                }
                CameraCommand::Release => self.release().await,
                CameraCommand::Shutdown => break,
            }
        }

        self.release().await;
        debug!("Camera session ended");
    }

    async fn acquire(&mut self, generation: u64, facing: FacingMode) {
        self.release().await;

        let constraints = StreamConstraints::new(facing)
            .with_resolution(self.config.ideal_width, self.config.ideal_height);
        info!(
            "Acquiring {} camera at {}x{} (generation {})",
            facing, constraints.ideal_width, constraints.ideal_height, generation
        );

        let source = match self.provider.acquire(&constraints).await {
            Ok(source) => source,
            Err(e) => {
                warn!("Camera acquisition failed (generation {}): {}", generation, e);
                let reason = match e {
                    Error::CameraAcquisition { reason } => reason,
                    other => other.to_string(),
                };
                let _ = self
                    .events
                    .send(CameraEvent::AcquisitionFailed { generation, reason })
                    .await;
                return;
            }
        };

        let stream = CameraStream::new(source);
        let device = stream.label().to_string();
        let started = CameraEvent::Started {
            generation,
            facing,
            device,
        };
        if self.events.send(started).await.is_err() {
            // Nobody listens; `stream` drops here and releases.
            return;
        }

        self.engine
            .start(stream, generation, self.events.clone())
            .await;
    }

    async fn release(&mut self) {
        self.engine.stop().await;
    }
}
