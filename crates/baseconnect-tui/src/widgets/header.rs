//! Title bar: screen name, selected camera and the live device label

use baseconnect_core::FacingMode;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::theme::{palette, styles};

pub struct Header<'a> {
    facing: FacingMode,
    device: Option<&'a str>,
}

impl<'a> Header<'a> {
    pub fn new(facing: FacingMode, device: Option<&'a str>) -> Self {
        Self { facing, device }
    }
}

/// French label of the camera side
pub fn facing_label(facing: FacingMode) -> &'static str {
    match facing {
        FacingMode::Environment => "arrière",
        FacingMode::User => "avant",
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);

        let mut spans = vec![
            Span::styled(
                " Scan EPI",
                Style::default()
                    .fg(palette::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  │  ", styles::text_muted()),
            Span::styled("Caméra ", styles::text_secondary()),
            Span::styled(facing_label(self.facing), styles::text_primary()),
        ];
        if let Some(device) = self.device {
            spans.push(Span::styled("  │  ", styles::text_muted()));
            spans.push(Span::styled(device.to_string(), styles::text_muted()));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}
