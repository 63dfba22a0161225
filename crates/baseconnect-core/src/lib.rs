//! # baseconnect-core - Core Domain Types
//!
//! Foundation crate for the BaseConnect scanner. Provides domain types, error
//! handling, scan event definitions, the equipment record shape, and logging
//! setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`FacingMode`] - Rear ("environment") or front ("user") camera preference
//! - [`CameraState`] - Visible state of a scan session
//! - [`SymbolFormat`], [`DecodeHints`] - What the decoder attempts, and how often
//! - [`StreamConstraints`] - What a camera acquisition asks the platform for
//! - [`AppPhase`] - Screen lifecycle (Running, Quitting)
//!
//! ### Events (`events`)
//! - [`DecodeEvent`] - One decode attempt's outcome
//! - [`CameraEvent`] - Camera session output, tagged with its generation
//!
//! ### Equipment (`equipment`)
//! - [`Equipment`] - Record returned by the equipment lookup
//! - [`LookupOutcome`] - Found / not found / failed
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use baseconnect_core::prelude::*;
//! ```

pub mod equipment;
pub mod error;
pub mod events;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all BaseConnect crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use equipment::{Equipment, LookupOutcome};
pub use error::{Error, Result, ResultExt};
pub use events::{CameraEvent, DecodeEvent};
pub use types::{
    AppPhase, CameraState, DecodeHints, FacingMode, StreamConstraints, SymbolFormat,
    DEFAULT_POLL_INTERVAL_MS,
};
