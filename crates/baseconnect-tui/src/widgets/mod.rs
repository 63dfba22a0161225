//! Widget components for the scanner screen

mod equipment_modal;
mod footer;
mod header;
pub mod modal_overlay;
mod status_card;
mod viewfinder;

pub use equipment_modal::EquipmentModal;
pub use footer::{key_hints, Footer};
pub use header::{facing_label, Header};
pub use status_card::StatusCard;
pub use viewfinder::{laser_row, Viewfinder};
