//! Native camera through `nokhwa`
//!
//! The device handle is not `Send` on every backend, so it lives on a
//! dedicated capture thread for its whole life. Frames come back over a
//! one-slot channel; frames captured while the slot is full are dropped.

use std::sync::mpsc::{self, RecvTimeoutError, SyncSender, TryRecvError, TrySendError};
use std::thread;
use std::time::Duration;

use nokhwa::pixel_format::LumaFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use tokio::sync::oneshot;

use baseconnect_core::prelude::*;
use baseconnect_core::{FacingMode, StreamConstraints};

use crate::frame::Frame;
use crate::provider::{CameraProvider, FrameSource};

/// How long a grab waits for the capture thread before reporting no frame
const GRAB_TIMEOUT: Duration = Duration::from_millis(200);

/// Consecutive capture errors after which the stream is considered dead
const MAX_CAPTURE_ERRORS: u32 = 10;

const REQUESTED_FPS: u32 = 30;

/// [`CameraProvider`] for locally attached cameras
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCameraProvider {
    environment_index: u32,
    user_index: u32,
}

impl NativeCameraProvider {
    pub fn new(environment_index: u32, user_index: u32) -> Self {
        Self {
            environment_index,
            user_index,
        }
    }

    pub fn device_index(&self, facing: FacingMode) -> u32 {
        match facing {
            FacingMode::Environment => self.environment_index,
            FacingMode::User => self.user_index,
        }
    }
}

impl Default for NativeCameraProvider {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl CameraProvider for NativeCameraProvider {
    async fn acquire(&self, constraints: &StreamConstraints) -> Result<Box<dyn FrameSource>> {
        let index = self.device_index(constraints.facing);
        let (width, height) = (constraints.ideal_width, constraints.ideal_height);

        let (ready_tx, ready_rx) = oneshot::channel();
        let (frame_tx, frame_rx) = mpsc::sync_channel(1);
        let (stop_tx, stop_rx) = mpsc::channel();

        thread::Builder::new()
            .name(format!("bcscan-camera-{}", index))
            .spawn(move || capture_thread(index, width, height, ready_tx, frame_tx, stop_rx))
            .map_err(|e| Error::camera_acquisition(format!("capture thread: {}", e)))?;

        let label = ready_rx
            .await
            .map_err(|_| Error::camera_acquisition("capture thread exited during startup"))??;

        Ok(Box::new(NativeSource {
            label,
            frames: frame_rx,
            stop_tx: Some(stop_tx),
        }))
    }
}

type CapturedFrame = std::result::Result<Frame, String>;

fn capture_thread(
    index: u32,
    width: u32,
    height: u32,
    ready_tx: oneshot::Sender<Result<String>>,
    frame_tx: SyncSender<CapturedFrame>,
    stop_rx: mpsc::Receiver<()>,
) {
    let requested = RequestedFormat::new::<LumaFormat>(RequestedFormatType::Closest(
        CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, REQUESTED_FPS),
    ));

    let mut camera = match Camera::new(CameraIndex::Index(index), requested) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready_tx.send(Err(Error::camera_acquisition(e.to_string())));
            return;
        }
    };
    if let Err(e) = camera.open_stream() {
        let _ = ready_tx.send(Err(Error::camera_acquisition(e.to_string())));
        return;
    }

    let label = camera.info().human_name();
    info!(
        "Camera '{}' opened at {:?} (index {})",
        label,
        camera.resolution(),
        index
    );
    if ready_tx.send(Ok(label)).is_err() {
        let _ = camera.stop_stream();
        return;
    }

    let mut errors = 0u32;
    loop {
        match stop_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        let captured = camera
            .frame()
            .map_err(|e| e.to_string())
            .and_then(|buffer| buffer.decode_image::<LumaFormat>().map_err(|e| e.to_string()))
            .and_then(|image| {
                let (w, h) = (image.width(), image.height());
                Frame::new(w, h, image.into_raw()).map_err(|e| e.to_string())
            });

        let captured = match captured {
            Ok(frame) => {
                errors = 0;
                Ok(frame)
            }
            Err(e) => {
                errors += 1;
                trace!("Capture error {}/{}: {}", errors, MAX_CAPTURE_ERRORS, e);
                if errors < MAX_CAPTURE_ERRORS {
                    continue;
                }
                Err(e)
            }
        };
        let dead = captured.is_err();

        match frame_tx.try_send(captured) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => break,
        }
        if dead {
            break;
        }
    }

    if let Err(e) = camera.stop_stream() {
        warn!("Failed to stop camera stream: {}", e);
    }
    debug!("Capture thread for camera {} finished", index);
}

struct NativeSource {
    label: String,
    frames: mpsc::Receiver<CapturedFrame>,
    stop_tx: Option<mpsc::Sender<()>>,
}

impl FrameSource for NativeSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn grab(&mut self) -> Result<Option<Frame>> {
        match self.frames.recv_timeout(GRAB_TIMEOUT) {
            Ok(Ok(frame)) => Ok(Some(frame)),
            Ok(Err(reason)) => Err(Error::camera_stream(reason)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(Error::camera_stream("capture thread ended"))
            }
        }
    }

    fn release(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}
