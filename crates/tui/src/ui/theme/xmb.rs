use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Greens of the portfolio's animated background gradient
pub const BLACK: Color = Color::Rgb(0x00, 0x00, 0x00); // #000000
pub const DEEP_FOREST: Color = Color::Rgb(0x0F, 0x1F, 0x0F); // #0f1f0f
pub const MOSS: Color = Color::Rgb(0x2D, 0x5A, 0x27); // #2d5a27
pub const SAGE: Color = Color::Rgb(0x4A, 0x7C, 0x59); // #4a7c59

// Foreground
pub const WHITE: Color = Color::Rgb(0xF2, 0xF5, 0xF0); // #f2f5f0 - active text
pub const MIST: Color = Color::Rgb(0xB8, 0xC7, 0xB5); // #b8c7b5 - secondary text
pub const FOG: Color = Color::Rgb(0x7A, 0x8C, 0x78); // #7a8c78 - inactive items
pub const GLOW: Color = Color::Rgb(0xC9, 0xF2, 0xA8); // #c9f2a8 - pulse peak
pub const AMBER: Color = Color::Rgb(0xE8, 0xC1, 0x6B); // #e8c16b - inline code

/// Default theme: dark green cross menu with white highlights.
#[derive(Debug, Clone)]
pub struct XmbTheme {
    roles: ThemeRoles,
}

impl XmbTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: DEEP_FOREST,
                border: MOSS,

                text: WHITE,
                text_secondary: MIST,
                text_muted: FOG,

                accent_primary: WHITE,
                accent_secondary: GLOW,

                heading: GLOW,
                code: AMBER,

                modal_bg: BLACK,
            },
        }
    }
}

impl Default for XmbTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for XmbTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// Same palette with the border lifted for low-contrast displays.
#[derive(Debug, Clone)]
pub struct XmbThemeHighContrast {
    roles: ThemeRoles,
}

impl XmbThemeHighContrast {
    pub fn new() -> Self {
        let mut roles = XmbTheme::new().roles;
        roles.background = BLACK;
        roles.border = SAGE;
        roles.text_muted = MIST;
        Self { roles }
    }
}

impl Default for XmbThemeHighContrast {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for XmbThemeHighContrast {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
