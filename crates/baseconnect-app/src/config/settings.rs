//! Settings parser for config.toml

use super::types::Settings;
use baseconnect_core::prelude::*;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_DIR: &str = "baseconnect";

/// Overrides `lookup.base_url`
pub const URL_ENV: &str = "BASECONNECT_URL";
/// Overrides `lookup.api_key`
pub const API_KEY_ENV: &str = "BASECONNECT_API_KEY";

/// Contents written by [`init_config`]
pub const DEFAULT_CONFIG_TOML: &str = r#"# BaseConnect scanner configuration

[scanner]
poll_interval_ms = 50         # Delay between decode attempts
formats = []                  # Empty = all supported formats, e.g. ["qr_code", "ean_13"]
default_facing = "environment" # "environment" (rear) or "user" (front)
ideal_width = 1280
ideal_height = 720
max_stream_recoveries = 2     # Automatic reacquisitions when a live stream dies

[camera]
backend = "native"            # "native" or "frames"
# frames_dir = "/path/to/frames"
environment_index = 0
user_index = 1

[lookup]
backend = "rest"              # "rest" or "catalog"
# base_url = "https://your-project.supabase.co"   # or BASECONNECT_URL
# api_key = ""                                     # or BASECONNECT_API_KEY
table = "epis"
code_column = "code_barre"
timeout_ms = 10000
transient_retries = 0
# catalog_path = "/path/to/epis.json"
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Default location: `<config dir>/baseconnect/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `path`, then apply environment overrides.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = read_settings(path);
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn read_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Empty variables are ignored.
pub fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(url) = var(URL_ENV).filter(|v| !v.trim().is_empty()) {
        settings.lookup.base_url = Some(url);
    }
    if let Some(key) = var(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
        settings.lookup.api_key = Some(key);
    }
}

/// Write the commented default config to `path`.
///
/// Returns `false` when a file already exists there (it is left untouched).
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::config(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
    }

    std::fs::write(path, DEFAULT_CONFIG_TOML)
        .map_err(|e| Error::config(format!("Failed to write {}: {}", path.display(), e)))?;
    info!("Wrote default config to {}", path.display());
    Ok(true)
}
