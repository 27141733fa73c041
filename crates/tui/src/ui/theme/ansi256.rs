//! ANSI 256-color fallback theme for terminals without truecolor support.
//!
//! Approximates the green cross menu palette with indexed colors.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

#[derive(Debug, Clone)]
pub struct Ansi256Theme {
    roles: ThemeRoles,
}

impl Ansi256Theme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: Color::Indexed(233),
                border: Color::Indexed(28),

                text: Color::Indexed(255),
                text_secondary: Color::Indexed(250),
                text_muted: Color::Indexed(244),

                accent_primary: Color::Indexed(255),
                accent_secondary: Color::Indexed(157),

                heading: Color::Indexed(157),
                code: Color::Indexed(222),

                modal_bg: Color::Indexed(16),
            },
        }
    }
}

impl Default for Ansi256Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for Ansi256Theme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
