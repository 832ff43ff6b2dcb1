//! Key handling, split by the part of the interface it serves. Each file
//! adds methods to [`App`](crate::app::App).

pub mod card_handlers;
pub mod checklist_handlers;
pub mod dialog_handlers;
pub mod navigation_handlers;
pub mod popup_handlers;
