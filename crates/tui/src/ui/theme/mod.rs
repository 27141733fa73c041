//! Theme styling module for the cross menu.
//!
//! Defines the green XMB palette, an ANSI 256-color fallback, semantic theme
//! roles, and helper builders for Ratatui widgets. Prefer these helpers over
//! hard-coding colors.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod roles;
pub mod theme_helpers;
pub mod xmb;

pub use ansi256::Ansi256Theme;
pub use roles::{Theme, ThemeRoles};
pub use xmb::{XmbTheme, XmbThemeHighContrast};

/// Environment variable naming the theme; wins over the config file.
pub const THEME_ENV: &str = "XMB_THEME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme from `XMB_THEME`, the configured name, and terminal capabilities.
///
/// Terminals without truecolor always get the ANSI palette, except when the
/// caller asks for it by name, which is honored everywhere.
pub fn load(preferred_theme: Option<&str>) -> Box<dyn Theme> {
    let requested = env::var(THEME_ENV)
        .ok()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| preferred_theme.map(str::to_string));

    let capability = detect_color_capability();
    match requested.as_deref().map(str::trim) {
        Some(name) => match resolve(name, capability) {
            Some(theme) => theme,
            None => {
                debug!(theme = name, "unknown theme; using default palette");
                default_theme(capability)
            }
        },
        None => default_theme(capability),
    }
}

fn resolve(name: &str, capability: ColorCapability) -> Option<Box<dyn Theme>> {
    let normalized = name.to_ascii_lowercase().replace(['_', ' '], "-");
    match normalized.as_str() {
        "ansi256" | "ansi" | "256" => Some(Box::new(Ansi256Theme::new())),
        _ if capability == ColorCapability::Ansi256 => {
            debug!("ANSI-only terminal detected; forcing fallback palette");
            Some(Box::new(Ansi256Theme::new()))
        }
        "xmb" | "green" | "default" => Some(Box::new(XmbTheme::new())),
        "xmb-hc" | "xmb-high-contrast" | "high-contrast" => Some(Box::new(XmbThemeHighContrast::new())),
        _ => None,
    }
}

fn default_theme(capability: ColorCapability) -> Box<dyn Theme> {
    match capability {
        ColorCapability::Truecolor => Box::new(XmbTheme::new()),
        ColorCapability::Ansi256 => Box::new(Ansi256Theme::new()),
    }
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var("XMB_COLOR_MODE").ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") || term.contains("direct") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;

    fn with_env<R>(theme: Option<&str>, mode: &str, f: impl FnOnce() -> R) -> R {
        temp_env::with_vars(
            [
                (THEME_ENV, theme),
                ("XMB_COLOR_MODE", Some(mode)),
                ("COLORTERM", None),
                ("TERM", Some("xterm-256color")),
            ],
            f,
        )
    }

    #[test]
    fn truecolor_defaults_to_green_palette() {
        let theme = with_env(None, "truecolor", || load(None));
        assert_eq!(theme.roles().background, xmb::DEEP_FOREST);
    }

    #[test]
    fn ansi_terminal_forces_indexed_palette() {
        let theme = with_env(None, "256", || load(Some("xmb")));
        assert!(matches!(theme.roles().background, Color::Indexed(_)));
    }

    #[test]
    fn env_wins_over_config_and_unknown_names_fall_back() {
        let theme = with_env(Some("ansi256"), "truecolor", || load(Some("xmb")));
        assert!(matches!(theme.roles().text, Color::Indexed(_)));

        let theme = with_env(None, "truecolor", || load(Some("solarized")));
        assert_eq!(theme.roles().background, xmb::DEEP_FOREST);

        let theme = with_env(None, "truecolor", || load(Some("High Contrast")));
        assert_eq!(theme.roles().background, xmb::BLACK);
    }
}
