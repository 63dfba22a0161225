//! Scan frame with corner brackets and a sweeping laser line

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::theme::{palette, styles};

/// Corner bracket arm length, in cells
const ARM: u16 = 3;

pub struct Viewfinder<'a> {
    step: usize,
    processing: bool,
    spinner: &'a str,
}

impl<'a> Viewfinder<'a> {
    pub fn new(step: usize, processing: bool, spinner: &'a str) -> Self {
        Self {
            step,
            processing,
            spinner,
        }
    }
}

/// Row of the laser inside a frame of `inner_height` rows.
///
/// The line travels down then back up, one row per step.
pub fn laser_row(step: usize, inner_height: u16) -> u16 {
    let span = inner_height as usize;
    if span <= 1 {
        return 0;
    }
    let period = 2 * (span - 1);
    let phase = step % period;
    let row = if phase < span { phase } else { period - phase };
    row as u16
}

/// Square-looking frame in the middle of `area`, leaving two rows below
/// for the status pill.
pub fn frame_rect(area: Rect) -> Rect {
    let height = area.height.saturating_sub(4).clamp(3, 16);
    // Terminal cells are about twice as tall as wide
    let width = height.saturating_mul(2).min(area.width.saturating_sub(4));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height + 2) / 2;
    Rect::new(x, y, width, height.min(area.height))
}

fn put(buf: &mut Buffer, x: u16, y: u16, symbol: &str, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}

fn render_corners(buf: &mut Buffer, rect: Rect) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let style = Style::default()
        .fg(palette::PRIMARY)
        .add_modifier(Modifier::BOLD);
    let (left, right) = (rect.left(), rect.right() - 1);
    let (top, bottom) = (rect.top(), rect.bottom() - 1);
    let arm = ARM.min(rect.width / 2).min(rect.height / 2).max(1);

    put(buf, left, top, "┏", style);
    put(buf, right, top, "┓", style);
    put(buf, left, bottom, "┗", style);
    put(buf, right, bottom, "┛", style);
    for i in 1..arm {
        put(buf, left + i, top, "━", style);
        put(buf, right - i, top, "━", style);
        put(buf, left + i, bottom, "━", style);
        put(buf, right - i, bottom, "━", style);
        put(buf, left, top + i, "┃", style);
        put(buf, right, top + i, "┃", style);
        put(buf, left, bottom - i, "┃", style);
        put(buf, right, bottom - i, "┃", style);
    }
}

impl Widget for Viewfinder<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let frame = frame_rect(area);
        render_corners(buf, frame);

        let inner_height = frame.height.saturating_sub(2);
        if inner_height > 0 && frame.width > 4 {
            let y = frame.y + 1 + laser_row(self.step, inner_height);
            let laser = Style::default().fg(palette::LASER);
            for x in frame.x + 2..frame.right() - 2 {
                put(buf, x, y, "─", laser);
            }
        }

        let status = if self.processing {
            Line::from(vec![
                Span::styled(format!("{} ", self.spinner), styles::keybinding()),
                Span::styled("Recherche...", styles::text_primary()),
            ])
        } else {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(palette::LASER)),
                Span::styled("Recherche active...", styles::text_primary()),
            ])
        };
        let status_y = frame.bottom().saturating_add(1);
        if status_y < area.bottom() {
            Paragraph::new(status)
                .alignment(Alignment::Center)
                .render(Rect::new(area.x, status_y, area.width, 1), buf);
        }
    }
}
