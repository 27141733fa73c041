use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding},
};

use super::roles::{Theme, ThemeRoles};

/// Build a rounded Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .padding(Padding::horizontal(1))
        .style(theme.modal_background_style());
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.heading_style()));
    }
    block
}

/// Style for the full-screen backdrop behind the menu.
pub fn backdrop_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { background, text, .. } = *theme.roles();
    Style::default().bg(background).fg(text)
}

/// Linear blend between two RGB colors, `t` in `0.0..=1.0`.
///
/// Non-RGB colors snap to whichever end is closer.
pub fn blend_rgb(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) => {
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

/// Darken an RGB color by a multiplicative factor (0.0..=1.0).
/// If the color is not RGB, returns it unchanged.
pub fn darken_rgb(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(..) => blend_rgb(Color::Rgb(0, 0, 0), color, factor),
        other => other,
    }
}

/// Style for an inactive menu icon at pulse intensity `level` (0.0..=1.0).
pub fn pulse_style<T: Theme + ?Sized>(theme: &T, level: f32) -> Style {
    let ThemeRoles {
        text_muted,
        accent_secondary,
        ..
    } = *theme.roles();
    let style = Style::default().fg(blend_rgb(text_muted, accent_secondary, level));
    if level >= 0.5 { style.add_modifier(Modifier::BOLD) } else { style }
}

/// Style for an inactive item under the pointer: dimmed below the muted text.
pub fn hovered_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let dimmed = darken_rgb(theme.roles().text_muted, 0.7);
    theme.hover_style().fg(dimmed)
}
