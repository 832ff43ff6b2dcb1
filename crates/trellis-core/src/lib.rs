pub mod config;
pub mod error;
pub mod input;
pub mod result;
pub mod selection;

pub use config::{AppConfig, DefaultView, ThemeConfig};
pub use error::TrellisError;
pub use input::InputState;
pub use result::TrellisResult;
pub use selection::SelectionState;
