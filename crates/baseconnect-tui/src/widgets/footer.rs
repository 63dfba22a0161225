//! Key hints for the overlay on screen

use baseconnect_app::Overlay;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::theme::styles;

pub struct Footer<'a> {
    overlay: &'a Overlay<'a>,
}

impl<'a> Footer<'a> {
    pub fn new(overlay: &'a Overlay<'a>) -> Self {
        Self { overlay }
    }
}

/// `(key, label)` pairs valid for an overlay, in display order
pub fn key_hints(overlay: &Overlay<'_>) -> Vec<(&'static str, &'static str)> {
    let mut hints = match overlay {
        Overlay::Idle => vec![("s", "Démarrer"), ("f", "Caméra")],
        Overlay::Loading | Overlay::Scanning { .. } => vec![("f", "Caméra")],
        Overlay::DeviceError { .. } => vec![("r", "Réessayer"), ("f", "Caméra")],
        Overlay::NotFound { .. } => vec![("s", "Scanner à nouveau")],
        Overlay::Success { .. } => vec![("s", "Scanner"), ("v", "Voir fiche")],
    };
    hints.push(("q", "Quitter"));
    hints
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in key_hints(self.overlay) {
            spans.push(Span::styled(format!("[{}]", key), styles::keybinding()));
            spans.push(Span::styled(format!(" {}   ", label), styles::text_muted()));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
