use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles used throughout the UI.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub background: Color,
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    /// Active menu item and active sub-item.
    pub accent_primary: Color,
    /// Peak color of the inactive-icon pulse.
    pub accent_secondary: Color,

    pub heading: Color,
    pub code: Color,

    /// Background of the reader overlay.
    ///
    /// Darker than the base background so the overlay reads as elevated
    /// above the menu.
    pub modal_bg: Color,
}

/// Theme trait exposes semantic roles and common style builders.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().accent_primary } else { self.roles().border };
        Style::default().fg(color)
    }

    /// Active menu item / sub-item.
    fn active_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }

    /// Inactive item under the mouse pointer.
    fn hover_style(&self) -> Style {
        self.text_muted_style().add_modifier(Modifier::UNDERLINED)
    }

    fn modal_background_style(&self) -> Style {
        Style::default().bg(self.roles().modal_bg).fg(self.roles().text)
    }

    fn heading_style(&self) -> Style {
        Style::default().fg(self.roles().heading).add_modifier(Modifier::BOLD)
    }

    fn code_style(&self) -> Style {
        Style::default().fg(self.roles().code)
    }
}
