pub mod app;
pub mod clipboard;
pub mod components;
pub mod dialog;
pub mod editor;
pub mod events;
pub mod handlers;
pub mod keymap;
pub mod layout;
pub mod markdown_renderer;
pub mod state;
pub mod sync;
pub mod theme;
pub mod ui;

pub use app::{App, AppMessage, ChecklistFocus, Viewport};
pub use state::{DomainStore, NavigationStore};
pub use sync::SyncScheduler;
