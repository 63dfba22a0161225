//! Screen layout for the scanner
//!
//! Header on top, the camera view in the middle, key hints at the bottom.

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas for the scanner layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title, facing mode and device label
    pub header: Rect,

    /// Camera view with its overlay
    pub body: Rect,

    /// Key hints for the current state
    pub footer: Rect,
}

pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Top border + title row + bottom border
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}
