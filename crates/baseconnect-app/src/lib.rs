//! # baseconnect-app - Scan State Machine and Orchestration
//!
//! Implements the TEA (The Elm Architecture) loop for the scanner screen:
//! camera events and user input become [`Message`]s, [`handler::update`] moves
//! the [`ScanSession`] through its states, and [`UpdateAction`]s drive the
//! camera session and the equipment lookup.
//!
//! ## Public API
//!
//! ### Engine
//! - [`Engine`] - Owns state, channels, camera session and lookup backend
//! - [`EngineEvent`] - Domain events for external consumers (headless output)
//!
//! ### TEA Core
//! - [`AppState`], [`ScanSession`] - The Model
//! - [`Message`] - Everything that can happen
//! - [`handler::update`] - The update function
//! - [`UpdateAction`] - Side effects the engine performs
//!
//! ### Presentation
//! - [`Overlay`] - The single overlay a session shows
//!
//! ### Collaborators
//! - [`lookup::EquipmentLookup`] - Point lookup of a record by code
//! - [`config::Settings`] - `config.toml`

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input_key;
pub mod lookup;
pub mod message;
pub mod overlay;
pub mod process;
pub mod signals;
pub mod state;

pub use config::Settings;
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use lookup::{EquipmentLookup, EquipmentStore, LocalEquipmentLookup};
pub use message::Message;
pub use overlay::Overlay;
pub use state::{AppState, ScanSession};
