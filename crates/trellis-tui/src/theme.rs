use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;
use trellis_core::ThemeConfig;

/// Resolved colours for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn parse_color(name: &str, fallback: Color) -> Color {
    Color::from_str(name.trim()).unwrap_or_else(|_| {
        tracing::warn!("Unknown theme colour '{}', using {:?}", name, fallback);
        fallback
    })
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            primary: parse_color(&config.primary, Color::Cyan),
            secondary: parse_color(&config.secondary, Color::Blue),
            accent: parse_color(&config.accent, Color::Magenta),
            warning: parse_color(&config.warning, Color::Yellow),
            error: parse_color(&config.error, Color::Red),
            muted: parse_color(&config.muted, Color::DarkGray),
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.primary)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn done(&self) -> Style {
        Style::default()
            .fg(self.muted)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn popup(&self) -> Style {
        Style::default().bg(Color::Black)
    }
}

/// Maps a Trello label colour name to a terminal colour.
pub fn label_color(name: Option<&str>) -> Color {
    match name.unwrap_or_default() {
        "green" | "green_dark" | "green_light" => Color::Green,
        "yellow" | "yellow_dark" | "yellow_light" => Color::Yellow,
        "orange" | "orange_dark" | "orange_light" => Color::LightRed,
        "red" | "red_dark" | "red_light" => Color::Red,
        "purple" | "purple_dark" | "purple_light" => Color::Magenta,
        "blue" | "blue_dark" | "blue_light" => Color::Blue,
        "sky" | "sky_dark" | "sky_light" => Color::Cyan,
        "lime" | "lime_dark" | "lime_light" => Color::LightGreen,
        "pink" | "pink_dark" | "pink_light" => Color::LightMagenta,
        "black" | "black_dark" | "black_light" => Color::DarkGray,
        _ => Color::Gray,
    }
}
