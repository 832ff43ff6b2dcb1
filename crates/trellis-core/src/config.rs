use crate::{TrellisError, TrellisResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SYNC_INTERVAL_MS: u64 = 300_000;

/// View shown when the dashboard starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultView {
    #[default]
    Home,
    MyCards,
}

/// Colour names (ratatui names or `#rrggbb`) used by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub warning: String,
    pub error: String,
    pub muted: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "cyan".to_string(),
            secondary: "blue".to_string(),
            accent: "magenta".to_string(),
            warning: "yellow".to_string(),
            error: "red".to_string(),
            muted: "darkgray".to_string(),
        }
    }
}

/// Dashboard configuration, stored as JSON. Every field is optional in the
/// file; missing fields fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub mouse: bool,
    pub theme: ThemeConfig,
    pub sync_interval_ms: u64,
    pub default_view: DefaultView,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mouse: false,
            theme: ThemeConfig::default(),
            sync_interval_ms: DEFAULT_SYNC_INTERVAL_MS,
            default_view: DefaultView::Home,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/trellis/config.json"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("trellis/config.json"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("trellis\\config.json"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Loads the user config, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> TrellisResult<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> TrellisResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> TrellisResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content).map_err(|e| {
            TrellisError::Validation(format!("invalid config: {}", e))
        })
    }

    pub fn save_to(&self, path: &Path) -> TrellisResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn with_mouse_override(mut self, mouse: Option<bool>) -> Self {
        if let Some(mouse) = mouse {
            self.mouse = mouse;
        }
        self
    }
}
