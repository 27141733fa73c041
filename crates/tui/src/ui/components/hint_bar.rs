//! Single-line strip of key bindings, with room for a status message.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::components::component::Component;

const MENU_HINTS: &[(&str, &str)] = &[
    ("←/→", "menu"),
    ("↑/↓", "items"),
    ("Enter", "read"),
    ("r", "reload"),
    ("q", "quit"),
];

const READER_HINTS: &[(&str, &str)] = &[("↑/↓", "scroll"), ("PgUp/PgDn", "page"), ("Esc", "close")];

#[derive(Debug, Default)]
pub struct HintBarComponent;

impl Component for HintBarComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let hints = if app.reader.is_some() { READER_HINTS } else { MENU_HINTS };

        let key_style = theme.text_secondary_style().add_modifier(Modifier::BOLD);
        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (key, label) in hints {
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::styled(format!(" {label}  "), theme.text_muted_style()));
        }

        let [left, right] = Layout::horizontal([Constraint::Min(0), Constraint::Length(32)]).areas(rect);
        frame.render_widget(Paragraph::new(Line::from(spans)), left);
        if let Some(status) = app.status.as_deref() {
            let status = Paragraph::new(Line::from(Span::styled(status, theme.text_secondary_style()))).right_aligned();
            frame.render_widget(status, right);
        }
    }
}
