//! Core domain type definitions

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Milliseconds between two decode attempts when nothing else is configured.
///
/// High on purpose: the scanner trades CPU for responsiveness.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Lower bound applied to configured poll intervals.
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Target resolution requested from the camera.
pub const IDEAL_WIDTH: u32 = 1280;
pub const IDEAL_HEIGHT: u32 = 720;

/// Screen lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    /// Scanner screen is mounted
    #[default]
    Running,
    /// Screen is being torn down
    Quitting,
}

// ─────────────────────────────────────────────────────────
// Facing mode
// ─────────────────────────────────────────────────────────

/// Camera selection preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear-facing camera
    #[default]
    Environment,
    /// Front-facing camera
    User,
}

impl FacingMode {
    /// The opposite camera
    pub fn toggled(self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "environment" | "back" | "rear" => Ok(FacingMode::Environment),
            "user" | "front" => Ok(FacingMode::User),
            other => Err(Error::config(format!("unknown facing mode '{}'", other))),
        }
    }
}

// ─────────────────────────────────────────────────────────
// Camera state
// ─────────────────────────────────────────────────────────

/// Visible state of a scan session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraState {
    /// Screen mounted, camera not requested yet
    #[default]
    Idle,
    /// Camera acquisition in flight
    Loading,
    /// Camera live, decode loop running
    Active,
    /// Camera could not be acquired
    Error,
    /// A code was read but no record matched (or the lookup failed)
    ScannedError,
    /// A code was read and its record is held for display
    Success,
}

impl CameraState {
    pub fn label(&self) -> &'static str {
        match self {
            CameraState::Idle => "idle",
            CameraState::Loading => "loading",
            CameraState::Active => "active",
            CameraState::Error => "error",
            CameraState::ScannedError => "scanned_error",
            CameraState::Success => "success",
        }
    }

    /// States that end a scan episode and wait for the user
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CameraState::Error | CameraState::ScannedError | CameraState::Success
        )
    }
}

impl fmt::Display for CameraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────
// Decode hints
// ─────────────────────────────────────────────────────────

/// Barcode symbologies the decoder can be asked to recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolFormat {
    QrCode,
    DataMatrix,
    #[serde(rename = "code_128")]
    Code128,
    #[serde(rename = "ean_13")]
    Ean13,
    #[serde(rename = "ean_8")]
    Ean8,
    #[serde(rename = "code_39")]
    Code39,
    #[serde(rename = "code_93")]
    Code93,
    UpcA,
    UpcE,
    Itf,
    Codabar,
}

impl SymbolFormat {
    /// Every format the scanner knows, in hint order
    pub const ALL: [SymbolFormat; 11] = [
        SymbolFormat::QrCode,
        SymbolFormat::DataMatrix,
        SymbolFormat::Code128,
        SymbolFormat::Ean13,
        SymbolFormat::Ean8,
        SymbolFormat::Code39,
        SymbolFormat::Code93,
        SymbolFormat::UpcA,
        SymbolFormat::UpcE,
        SymbolFormat::Itf,
        SymbolFormat::Codabar,
    ];
}

/// Immutable decoder configuration: which formats to try and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeHints {
    formats: BTreeSet<SymbolFormat>,
    poll_interval: Duration,
}

impl DecodeHints {
    /// Build hints from a format list and a poll interval.
    ///
    /// An empty list means every known format. The interval is clamped to
    /// [`MIN_POLL_INTERVAL_MS`].
    pub fn new(formats: impl IntoIterator<Item = SymbolFormat>, poll_interval_ms: u64) -> Self {
        let mut formats: BTreeSet<SymbolFormat> = formats.into_iter().collect();
        if formats.is_empty() {
            formats = SymbolFormat::ALL.into_iter().collect();
        }
        Self {
            formats,
            poll_interval: Duration::from_millis(poll_interval_ms.max(MIN_POLL_INTERVAL_MS)),
        }
    }

    pub fn formats(&self) -> &BTreeSet<SymbolFormat> {
        &self.formats
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for DecodeHints {
    fn default() -> Self {
        Self::new(SymbolFormat::ALL, DEFAULT_POLL_INTERVAL_MS)
    }
}

// ─────────────────────────────────────────────────────────
// Stream constraints
// ─────────────────────────────────────────────────────────

/// What a camera acquisition asks the platform for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl StreamConstraints {
    pub fn new(facing: FacingMode) -> Self {
        Self {
            facing,
            ideal_width: IDEAL_WIDTH,
            ideal_height: IDEAL_HEIGHT,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.ideal_width = width;
        self.ideal_height = height;
        self
    }
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self::new(FacingMode::default())
    }
}
