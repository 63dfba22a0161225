//! # baseconnect-camera - Camera Sessions and Decode Loop
//!
//! Acquires camera streams, samples them on a fixed interval, and publishes
//! every decode attempt as a [`CameraEvent`](baseconnect_core::CameraEvent).
//!
//! Depends on [`baseconnect_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Camera Capability
//! - [`CameraProvider`] - Async acquisition of a stream for given constraints
//! - [`FrameSource`] - A bound stream delivering grayscale [`Frame`]s
//! - [`CameraStream`] - Guard releasing its source exactly once
//!
//! ### Decoding
//! - [`DecoderEngine`] - Owns the decode loop task (configure / start / stop)
//! - [`SymbolDecoder`], [`RxingDecoder`] - Per-frame symbol reader
//!
//! ### Session
//! - [`spawn_camera_session()`] - Spawn the camera actor
//! - [`CameraHandle`] - Send acquire/release commands to the actor
//!
//! ### Providers
//! - [`FrameDirectoryProvider`] - Replays still images from a directory
//! - `NativeCameraProvider` - Local camera via `nokhwa` (feature `native-camera`)

pub mod decoder;
pub mod frame;
pub mod frames;
#[cfg(feature = "native-camera")]
pub mod native;
pub mod provider;
pub mod session;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use decoder::{DecoderEngine, RxingDecoder, SymbolDecoder};
pub use frame::Frame;
pub use frames::FrameDirectoryProvider;
#[cfg(feature = "native-camera")]
pub use native::NativeCameraProvider;
pub use provider::{CameraProvider, CameraStream, FrameSource, LocalCameraProvider};
pub use session::{spawn_camera_session, CameraHandle, CameraSessionConfig};
