//! Command-line overrides layered on top of `config.toml`

use std::path::PathBuf;

use baseconnect_app::config::{CameraBackend, LookupBackend};
use baseconnect_app::Settings;
use baseconnect_core::FacingMode;

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub facing: Option<FacingMode>,
    /// Replay images from this directory instead of a live camera
    pub frames: Option<PathBuf>,
    /// Look codes up in this JSON export instead of the record store
    pub catalog: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
}

impl CliOverrides {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(facing) = self.facing {
            settings.scanner.default_facing = facing;
        }
        if let Some(dir) = &self.frames {
            settings.camera.backend = CameraBackend::Frames;
            settings.camera.frames_dir = Some(dir.clone());
        }
        if let Some(path) = &self.catalog {
            settings.lookup.backend = LookupBackend::Catalog;
            settings.lookup.catalog_path = Some(path.clone());
        }
        if let Some(ms) = self.poll_interval_ms {
            settings.scanner.poll_interval_ms = ms;
        }
    }
}
