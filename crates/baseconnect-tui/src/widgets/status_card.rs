//! Centered cards for the non-live states: startup, camera error and the
//! "no match" result.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use super::modal_overlay::open_modal;
use crate::theme::{palette, styles};

const CARD_WIDTH: u16 = 44;

pub enum StatusCard<'a> {
    Loading { spinner: &'a str },
    DeviceError { message: &'a str },
    NotFound { message: &'a str, code: Option<&'a str> },
}

impl StatusCard<'_> {
    fn lines(&self) -> Vec<Line<'_>> {
        match self {
            StatusCard::Loading { spinner } => vec![
                Line::styled(spinner.to_string(), styles::keybinding()),
                Line::styled("Démarrage...", styles::text_primary()),
            ],
            StatusCard::DeviceError { message } => vec![
                Line::styled("Erreur Caméra", styles::title_error()),
                Line::default(),
                Line::styled(*message, styles::text_secondary()),
                Line::default(),
                button("r", "Réessayer"),
            ],
            StatusCard::NotFound { message, code } => {
                let mut lines = vec![
                    Line::styled(
                        "Résultat",
                        styles::text_primary().add_modifier(Modifier::BOLD),
                    ),
                    Line::default(),
                    Line::styled(*message, styles::text_secondary()),
                ];
                if let Some(code) = code {
                    lines.push(Line::styled(format!(" {} ", code), styles::code_chip()));
                }
                lines.push(Line::default());
                lines.push(button("s", "Scanner à nouveau"));
                lines
            }
        }
    }
}

fn button(key: &str, label: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" [{}] {} ", key, label),
        styles::button_primary(),
    ))
}

impl Widget for StatusCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        // Messages longer than the card wrap onto one extra row
        let height = lines.len() as u16 + 3;
        let rect = open_modal(buf, area, CARD_WIDTH, height);

        let block = match &self {
            StatusCard::Loading { .. } => {
                styles::glass_block(false).style(Style::default().bg(palette::DEEPEST_BG))
            }
            _ => styles::card_block(),
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(rect, buf);
    }
}
