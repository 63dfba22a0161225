//! Scan event definitions
//!
//! Events flow one way: camera session → app. Every camera event carries the
//! generation of the camera episode that produced it so the state machine can
//! drop output from streams it has already torn down.

use crate::types::FacingMode;

/// Outcome of a single decode attempt against one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// A symbol was read; text is passed through exactly as decoded
    Decoded(String),
    /// No symbol in this frame (steady state, never shown to the user)
    NotFound,
    /// The stream can no longer deliver frames
    Fatal(String),
}

impl DecodeEvent {
    /// Classify raw decoder text.
    ///
    /// Empty or whitespace-only text is a miss. Anything else is the lookup
    /// key verbatim, including GS1 group separators (`0x1D`).
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            DecodeEvent::NotFound
        } else {
            DecodeEvent::Decoded(text.to_string())
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, DecodeEvent::Decoded(_))
    }
}

/// Output of a camera session, tagged with the episode generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    /// Stream acquired and decode loop running
    Started {
        generation: u64,
        facing: FacingMode,
        device: String,
    },
    /// Acquisition was refused (permission, no device, busy)
    AcquisitionFailed { generation: u64, reason: String },
    /// One decode attempt finished
    Decode { generation: u64, event: DecodeEvent },
    /// Stream handed back to the platform
    Released { generation: u64 },
}

impl CameraEvent {
    pub fn generation(&self) -> u64 {
        match self {
            CameraEvent::Started { generation, .. }
            | CameraEvent::AcquisitionFailed { generation, .. }
            | CameraEvent::Decode { generation, .. }
            | CameraEvent::Released { generation } => *generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_keeps_symbol_verbatim() {
        assert_eq!(
            DecodeEvent::from_text("1234567890123"),
            DecodeEvent::Decoded("1234567890123".to_string())
        );
        assert_eq!(
            DecodeEvent::from_text(" 12345 "),
            DecodeEvent::Decoded(" 12345 ".to_string())
        );
    }

    #[test]
    fn test_empty_text_is_not_found() {
        assert_eq!(DecodeEvent::from_text(""), DecodeEvent::NotFound);
        assert_eq!(DecodeEvent::from_text("   "), DecodeEvent::NotFound);
    }

    #[test]
    fn test_gs1_group_separator_is_decoded() {
        let gs1 = "0103453120000011\u{1d}10LOT42";
        assert_eq!(
            DecodeEvent::from_text(gs1),
            DecodeEvent::Decoded(gs1.to_string())
        );
        assert!(DecodeEvent::from_text("AB\u{0}CD").is_hit());
    }

    #[test]
    fn test_camera_event_generation() {
        let event = CameraEvent::Decode {
            generation: 7,
            event: DecodeEvent::NotFound,
        };
        assert_eq!(event.generation(), 7);
        assert_eq!(CameraEvent::Released { generation: 3 }.generation(), 3);
    }
}
