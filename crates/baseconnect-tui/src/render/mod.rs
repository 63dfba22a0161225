//! Main render/view function (View in TEA pattern)


use baseconnect_app::{AppState, Overlay};
use chrono::NaiveDate;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::layout;
use crate::theme::{palette, styles};
use crate::widgets::{EquipmentModal, Footer, Header, StatusCard, Viewfinder};

/// Braille spinner frames, advanced by ticks
pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_symbol(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

/// Render the complete UI
pub fn view(frame: &mut Frame, state: &AppState) {
    view_at(frame, state, chrono::Local::now().date_naive());
}

/// Render with an explicit current date (expiry highlighting)
pub fn view_at(frame: &mut Frame, state: &AppState, today: NaiveDate) {
    let areas = layout::create(frame.area());
    let session = &state.session;
    let overlay = Overlay::from_session(session);

    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        frame.area(),
    );
    frame.render_widget(
        Header::new(session.facing_mode, session.device.as_deref()),
        areas.header,
    );

    render_body(frame, &overlay, state.spinner_frame, today, areas.body);

    frame.render_widget(Footer::new(&overlay), areas.footer);
}

fn render_body(frame: &mut Frame, overlay: &Overlay<'_>, tick: usize, today: NaiveDate, area: Rect) {
    let spinner = spinner_symbol(tick);
    match *overlay {
        Overlay::Idle => {
            let hint = Paragraph::new(vec![
                Line::styled("Caméra arrêtée", styles::text_secondary()),
                Line::styled("Appuyez sur [s] pour scanner", styles::text_muted()),
            ])
            .alignment(Alignment::Center);
            let y = area.y + area.height / 2;
            frame.render_widget(hint, Rect::new(area.x, y.saturating_sub(1), area.width, 2));
        }
        Overlay::Loading => {
            frame.render_widget(StatusCard::Loading { spinner }, area);
        }
        Overlay::DeviceError { message } => {
            frame.render_widget(StatusCard::DeviceError { message }, area);
        }
        Overlay::Scanning { processing } => {
            frame.render_widget(Viewfinder::new(tick, processing, spinner), area);
        }
        Overlay::NotFound { message, code } => {
            frame.render_widget(StatusCard::NotFound { message, code }, area);
        }
        Overlay::Success { equipment } => {
            frame.render_widget(EquipmentModal::new(equipment, today), area);
        }
    }
}
