//! Configuration types for the scanner
//!
//! Defines `Settings` (`config.toml`) and its sections.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use baseconnect_core::types::{IDEAL_HEIGHT, IDEAL_WIDTH};
use baseconnect_core::{DecodeHints, FacingMode, SymbolFormat, DEFAULT_POLL_INTERVAL_MS};

/// Application settings (`config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub scanner: ScannerSettings,

    #[serde(default)]
    pub camera: CameraSettings,

    #[serde(default)]
    pub lookup: LookupSettings,
}

// ─────────────────────────────────────────────────────────
// [scanner]
// ─────────────────────────────────────────────────────────

/// Decode loop and camera episode settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScannerSettings {
    /// Milliseconds between decode attempts
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Formats to try; empty means every supported format
    #[serde(default)]
    pub formats: Vec<SymbolFormat>,

    /// Camera used when the screen opens
    #[serde(default)]
    pub default_facing: FacingMode,

    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    /// Automatic reacquisitions after a live stream dies, per user action
    #[serde(default = "default_max_stream_recoveries")]
    pub max_stream_recoveries: u32,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            formats: Vec::new(),
            default_facing: FacingMode::default(),
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            max_stream_recoveries: default_max_stream_recoveries(),
        }
    }
}

impl ScannerSettings {
    pub fn decode_hints(&self) -> DecodeHints {
        DecodeHints::new(self.formats.iter().copied(), self.poll_interval_ms)
    }
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_ideal_width() -> u32 {
    IDEAL_WIDTH
}

fn default_ideal_height() -> u32 {
    IDEAL_HEIGHT
}

fn default_max_stream_recoveries() -> u32 {
    2
}

// ─────────────────────────────────────────────────────────
// [camera]
// ─────────────────────────────────────────────────────────

/// Where frames come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraBackend {
    /// Locally attached camera
    #[default]
    Native,
    /// Still images replayed from `frames_dir`
    Frames,
}

impl std::fmt::Display for CameraBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraBackend::Native => write!(f, "native"),
            CameraBackend::Frames => write!(f, "frames"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CameraSettings {
    #[serde(default)]
    pub backend: CameraBackend,

    #[serde(default)]
    pub frames_dir: Option<PathBuf>,

    /// Device index used for the rear ("environment") camera
    #[serde(default)]
    pub environment_index: u32,

    /// Device index used for the front ("user") camera
    #[serde(default = "default_user_index")]
    pub user_index: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            backend: CameraBackend::default(),
            frames_dir: None,
            environment_index: 0,
            user_index: default_user_index(),
        }
    }
}

fn default_user_index() -> u32 {
    1
}

// ─────────────────────────────────────────────────────────
// [lookup]
// ─────────────────────────────────────────────────────────

/// Where equipment records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupBackend {
    /// Record store REST endpoint
    #[default]
    Rest,
    /// Local JSON catalog
    Catalog,
}

impl std::fmt::Display for LookupBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupBackend::Rest => write!(f, "rest"),
            LookupBackend::Catalog => write!(f, "catalog"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LookupSettings {
    #[serde(default)]
    pub backend: LookupBackend,

    /// Record store root, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Anonymous API key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,

    /// Column holding the printed code
    #[serde(default = "default_code_column")]
    pub code_column: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Automatic retries of a failed (network) lookup before showing it
    #[serde(default)]
    pub transient_retries: u32,

    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            backend: LookupBackend::default(),
            base_url: None,
            api_key: None,
            table: default_table(),
            code_column: default_code_column(),
            timeout_ms: default_timeout_ms(),
            transient_retries: 0,
            catalog_path: None,
        }
    }
}

fn default_table() -> String {
    "epis".to_string()
}

fn default_code_column() -> String {
    "code_barre".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}
