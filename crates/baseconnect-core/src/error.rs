//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    // ─────────────────────────────────────────────────────────────
    // Camera Errors
    // ─────────────────────────────────────────────────────────────
    /// Permission denied, no matching device, or device busy.
    #[error("Camera acquisition failed: {reason}")]
    CameraAcquisition { reason: String },

    /// The bound stream stopped delivering frames.
    #[error("Camera stream error: {message}")]
    CameraStream { message: String },

    // ─────────────────────────────────────────────────────────────
    // Equipment Lookup Errors
    // ─────────────────────────────────────────────────────────────
    /// Network or backend failure while looking up a code.
    #[error("{message}")]
    Lookup { message: String },

    #[error("Equipment catalog not found: {path}")]
    CatalogNotFound { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn camera_acquisition(reason: impl Into<String>) -> Self {
        Self::CameraAcquisition {
            reason: reason.into(),
        }
    }

    pub fn camera_stream(message: impl Into<String>) -> Self {
        Self::CameraStream {
            message: message.into(),
        }
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors land the scan session in a state with a retry action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::CameraAcquisition { .. }
                | Error::CameraStream { .. }
                | Error::Lookup { .. }
                | Error::ChannelSend { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Terminal { .. } | Error::CatalogNotFound { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::camera_acquisition("permission denied");
        assert_eq!(
            err.to_string(),
            "Camera acquisition failed: permission denied"
        );

        let err = Error::channel_send("camera session closed");
        assert!(err.to_string().contains("camera session closed"));
    }

    #[test]
    fn test_lookup_error_displays_bare_message() {
        // Shown verbatim in the not-found panel
        let err = Error::lookup("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::terminal("raw mode").is_fatal());
        assert!(Error::CatalogNotFound {
            path: PathBuf::from("/missing.json")
        }
        .is_fatal());
        assert!(!Error::camera_acquisition("busy").is_fatal());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::camera_acquisition("no device").is_recoverable());
        assert!(Error::camera_stream("unplugged").is_recoverable());
        assert!(Error::lookup("timeout").is_recoverable());
        assert!(!Error::terminal("raw mode").is_recoverable());
    }

    #[test]
    fn test_context_preserves_error() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.context("reading catalog").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
