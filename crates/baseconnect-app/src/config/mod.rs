//! Configuration file parsing for the scanner
//!
//! Supports `<config dir>/baseconnect/config.toml` plus the
//! `BASECONNECT_URL` / `BASECONNECT_API_KEY` environment overrides.

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, config_path, init_config, load_settings, API_KEY_ENV,
    DEFAULT_CONFIG_TOML, URL_ENV,
};
pub use types::*;
