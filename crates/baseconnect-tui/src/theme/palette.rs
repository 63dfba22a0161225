//! Color palette for the scanner screen.

use ratatui::style::Color;

// --- Background layers ---
pub const DEEPEST_BG: Color = Color::Black;
pub const CARD_BG: Color = Color::Rgb(30, 41, 59);
pub const POPUP_BG: Color = Color::Rgb(248, 250, 252);

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::White;

// --- Brand ---
pub const PRIMARY: Color = Color::Rgb(220, 38, 38); // Fire-service red
pub const LASER: Color = Color::LightRed;

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;
pub const TEXT_ON_POPUP: Color = Color::Rgb(15, 23, 42);
pub const TEXT_ON_POPUP_MUTED: Color = Color::Rgb(71, 85, 105);

// --- Status ---
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_YELLOW: Color = Color::Yellow;

// --- Badges ---
pub const BADGE_OK_BG: Color = Color::Rgb(220, 252, 231);
pub const BADGE_OK_FG: Color = Color::Rgb(22, 101, 52);
pub const BADGE_BAD_BG: Color = Color::Rgb(254, 226, 226);
pub const BADGE_BAD_FG: Color = Color::Rgb(153, 27, 27);
pub const BADGE_NEUTRAL_BG: Color = Color::Rgb(241, 245, 249);
pub const BADGE_NEUTRAL_FG: Color = Color::Rgb(71, 85, 105);

// --- Effects ---
pub const SHADOW: Color = Color::Black;
