//! Semantic style builders for the scanner screen.

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn title_error() -> Style {
    Style::default()
        .fg(palette::STATUS_RED)
        .add_modifier(Modifier::BOLD)
}

/// Raw scanned code, shown like a monospace chip
pub fn code_chip() -> Style {
    Style::default()
        .fg(palette::STATUS_YELLOW)
        .add_modifier(Modifier::BOLD)
}

// --- Buttons ---
pub fn button_primary() -> Style {
    Style::default()
        .fg(palette::TEXT_PRIMARY)
        .bg(palette::PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn button_secondary() -> Style {
    Style::default()
        .fg(palette::TEXT_ON_POPUP)
        .bg(palette::BADGE_NEUTRAL_BG)
}

/// Key letter in a hint (`[r]`)
pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

// --- Badges ---
/// État badge: green for equipment in service, red otherwise
pub fn state_badge(active: bool) -> Style {
    if active {
        Style::default()
            .fg(palette::BADGE_OK_FG)
            .bg(palette::BADGE_OK_BG)
    } else {
        Style::default()
            .fg(palette::BADGE_BAD_FG)
            .bg(palette::BADGE_BAD_BG)
    }
}

pub fn neutral_badge() -> Style {
    Style::default()
        .fg(palette::BADGE_NEUTRAL_FG)
        .bg(palette::BADGE_NEUTRAL_BG)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused {
            palette::BORDER_ACTIVE
        } else {
            palette::BORDER_DIM
        }))
}

/// Dark result card (camera error, lookup result)
pub fn card_block() -> Block<'static> {
    glass_block(false).style(Style::default().bg(palette::CARD_BG))
}

/// Light modal (success)
pub fn popup_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette::BADGE_NEUTRAL_FG))
        .style(Style::default().bg(palette::POPUP_BG).fg(palette::TEXT_ON_POPUP))
}
