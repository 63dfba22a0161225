//! Platform camera capability
//!
//! A [`CameraProvider`] turns [`StreamConstraints`] into a live
//! [`FrameSource`]. The source is wrapped in a [`CameraStream`] guard as soon as
//! it is handed out, so the device goes back to the platform on every path:
//! explicit release, decode-loop exit, or task abort.

use baseconnect_core::prelude::*;
use baseconnect_core::StreamConstraints;

use crate::frame::Frame;

/// A bound camera stream delivering frames.
///
/// `grab` blocks until a frame is available or the source decides there is
/// none ready yet (`Ok(None)`). It is only ever called from a blocking pool
/// thread.
pub trait FrameSource: Send {
    /// Human readable device name, for logs and the `Started` event
    fn label(&self) -> &str;

    /// Read the next frame. `Err` means the stream is dead.
    fn grab(&mut self) -> Result<Option<Frame>>;

    /// Hand the device back. Must tolerate repeated calls.
    fn release(&mut self);
}

/// Camera acquisition
///
/// Permission denied, no matching device, and busy device all surface as
/// [`Error::CameraAcquisition`].
#[trait_variant::make(CameraProvider: Send)]
pub trait LocalCameraProvider {
    /// Open a stream satisfying `constraints` as closely as the device allows
    async fn acquire(&self, constraints: &StreamConstraints) -> Result<Box<dyn FrameSource>>;
}

/// Owning guard around an acquired [`FrameSource`].
///
/// Releases the source exactly once, either through [`CameraStream::release`]
/// or on drop.
pub struct CameraStream {
    source: Option<Box<dyn FrameSource>>,
    label: String,
}

impl CameraStream {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        let label = source.label().to_string();
        Self {
            source: Some(source),
            label,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_released(&self) -> bool {
        self.source.is_none()
    }

    /// Read the next frame from the bound source
    pub fn grab(&mut self) -> Result<Option<Frame>> {
        match self.source.as_mut() {
            Some(source) => source.grab(),
            None => Err(Error::camera_stream(format!(
                "stream '{}' already released",
                self.label
            ))),
        }
    }

    /// Hand the device back to the platform (no-op after the first call)
    pub fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            debug!("Released camera stream '{}'", self.label);
        }
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        if !self.is_released() {
            debug!("CameraStream '{}' dropped while bound", self.label);
            self.release();
        }
    }
}

impl std::fmt::Debug for CameraStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraStream")
            .field("label", &self.label)
            .field("released", &self.is_released())
            .finish()
    }
}
