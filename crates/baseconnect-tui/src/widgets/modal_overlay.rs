//! Helpers shared by the cards and the success modal: centering, dimming
//! the camera view behind a modal, and a drop shadow.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Clear, Widget};

use crate::theme::palette;

/// Center a `width` x `height` rect in `area`, clamped to the area.
///
/// ```
/// use ratatui::layout::Rect;
/// use baseconnect_tui::widgets::modal_overlay::centered_rect;
///
/// let modal = centered_rect(40, 10, Rect::new(0, 0, 80, 24));
/// assert_eq!(modal, Rect::new(20, 7, 40, 10));
/// ```
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

/// Darken every cell of `area`, like a backdrop behind a modal.
pub fn dim_background(buf: &mut Buffer, area: Rect) {
    let dim = Style::default()
        .fg(palette::TEXT_MUTED)
        .bg(palette::DEEPEST_BG);

    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(dim);
            }
        }
    }
}

/// One-cell shadow along the right and bottom edges of `rect`.
///
/// Cells falling outside the buffer are skipped.
pub fn render_shadow(buf: &mut Buffer, rect: Rect) {
    let shadow = Style::default().fg(palette::SHADOW).bg(palette::SHADOW);
    let right = rect.right();
    let bottom = rect.bottom();

    let column = (rect.y.saturating_add(1)..=bottom).map(|y| (right, y));
    let row = (rect.x.saturating_add(1)..=right).map(|x| (x, bottom));
    for position in column.chain(row) {
        if let Some(cell) = buf.cell_mut(position) {
            cell.set_char(' ');
            cell.set_style(shadow);
        }
    }
}

/// Reserve a centered rect for modal content: shadow first, then clear.
///
/// Returns the rect to draw the modal into.
pub fn open_modal(buf: &mut Buffer, area: Rect, width: u16, height: u16) -> Rect {
    let rect = centered_rect(width, height, area);
    render_shadow(buf, rect);
    Clear.render(rect, buf);
    rect
}
