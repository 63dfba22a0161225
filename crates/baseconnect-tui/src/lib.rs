//! # baseconnect-tui - Terminal UI for the BaseConnect scanner
//!
//! Ratatui front end over [`baseconnect_app::Engine`]: the camera view with
//! its scan frame, the result cards and the success modal.
//!
//! ## Public API
//! - [`run`] - Run the scanner screen with an engine
//! - [`render::view`] - Draw one frame from an [`baseconnect_app::AppState`]

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

pub use runner::run;
