//! The cross menu itself: a row of icons with the active item's sub-items
//! hanging below it.
//!
//! Input is translated into navigator moves (returned as effects so the
//! runtime can run them off the event loop). Rendering reads the tweened
//! translates from [`Motion`](crate::ui::motion::Motion) and records a hit
//! area for every visible item so clicks and hover can be resolved later.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use xmb_types::{Direction, HorizontalDirection, VerticalDirection};

use crate::app::{App, Effect, HitTarget};
use crate::ui::components::component::Component;
use crate::ui::gesture::Gesture;
use crate::ui::layout::MenuGeometry;
use crate::ui::pulse::pulse_level;
use crate::ui::theme::{Theme, theme_helpers as th};

#[derive(Debug, Default)]
pub struct CrossMenuComponent;

impl CrossMenuComponent {
    /// Resolve a click on the last rendered frame.
    fn click(app: &mut App, column: u16, row: u16) -> Vec<Effect> {
        match app.hit_test(column, row) {
            Some(HitTarget::MenuItem(menu_index)) => vec![Effect::JumpMenu(menu_index)],
            Some(HitTarget::SubItem { menu_index, sub_index }) => {
                if app.navigator.active_sub_index(menu_index) == Some(sub_index) {
                    app.open_reader();
                    Vec::new()
                } else {
                    vec![Effect::JumpSub { menu_index, sub_index }]
                }
            }
            None => Vec::new(),
        }
    }

    /// Single-step move, skipped up front when the axis is already busy.
    fn step(app: &App, direction: impl Into<Direction>) -> Vec<Effect> {
        let direction = direction.into();
        if app.navigator.is_busy(direction.axis()) {
            return Vec::new();
        }
        vec![Effect::Move(direction)]
    }
}

impl Component for CrossMenuComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Self::step(app, HorizontalDirection::Left),
            KeyCode::Right | KeyCode::Char('l') => Self::step(app, HorizontalDirection::Right),
            KeyCode::Up | KeyCode::Char('k') => Self::step(app, VerticalDirection::Up),
            KeyCode::Down | KeyCode::Char('j') => Self::step(app, VerticalDirection::Down),
            KeyCode::Enter => {
                app.open_reader();
                Vec::new()
            }
            KeyCode::Char('r') => vec![Effect::ReloadPosts],
            KeyCode::Char('q') => vec![Effect::Quit],
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                app.swipe.press(mouse.column, mouse.row);
                Vec::new()
            }
            MouseEventKind::Up(MouseButton::Left) => match app.swipe.release(mouse.column, mouse.row) {
                Some(Gesture::Swipe(direction)) => Self::step(app, direction),
                Some(Gesture::Click { column, row }) => Self::click(app, column, row),
                None => Vec::new(),
            },
            MouseEventKind::ScrollUp => Self::step(app, VerticalDirection::Up),
            MouseEventKind::ScrollDown => Self::step(app, VerticalDirection::Down),
            MouseEventKind::Moved => {
                app.hover = if app.swipe.is_pressed() { None } else { app.hit_test(mouse.column, mouse.row) };
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let now = Instant::now();
        let theme = &*app.theme;
        frame.render_widget(Block::default().style(th::backdrop_style(theme)), rect);

        let geometry = MenuGeometry::new(rect);
        let profile = app.motion.profile();
        let state = app.navigator.snapshot();
        let active = state.active_menu_index();
        let pulse_clock = now.saturating_duration_since(app.started());
        let column_width = profile.horizontal_step.saturating_sub(2).max(4);
        let mut hit_areas = Vec::new();

        for (menu_index, entry) in app.model.items.iter().enumerate() {
            let Some(offset) = app.motion.column_offset(menu_index, now) else {
                continue;
            };
            let x = geometry.anchor_x + offset.round() as i32;
            let hovered = app.hover == Some(HitTarget::MenuItem(menu_index));
            let (icon_style, label_style) = if menu_index == active {
                (theme.active_style(), theme.active_style())
            } else if hovered {
                (th::hovered_style(theme), th::hovered_style(theme))
            } else {
                let level = pulse_level(pulse_clock, menu_index);
                (th::pulse_style(theme, level), theme.text_muted_style())
            };

            let Some(area) = geometry.clip(x, geometry.menu_row, column_width, 2) else {
                continue;
            };
            let lines = vec![
                Line::from(Span::styled(entry.icon.as_str(), icon_style)),
                Line::from(Span::styled(entry.label.as_str(), label_style)),
            ];
            frame.render_widget(Paragraph::new(lines), area);
            hit_areas.push((area, HitTarget::MenuItem(menu_index)));
        }

        let active_entry = app.model.items.get(active);
        let active_x = app.motion.column_offset(active, now).map(|offset| geometry.anchor_x + offset.round() as i32);
        if let (Some(entry), Some(x), Some(active_sub)) = (active_entry, active_x, state.active_sub_index(active)) {
            let show_descriptions = profile.vertical_step >= 3;
            let width = u16::try_from((i32::from(rect.x) + i32::from(rect.width) - x).max(0)).unwrap_or(0);
            for (sub_index, sub) in entry.sub_items.iter().enumerate() {
                let Some(offset) = app.motion.row_offset(active, sub_index, now) else {
                    continue;
                };
                let y = geometry.sub_anchor_row() + offset.round() as i32;
                // keep the icon row readable while sub-items pass through it
                if y == geometry.menu_row || y == geometry.menu_row + 1 {
                    continue;
                }
                let target = HitTarget::SubItem {
                    menu_index: active,
                    sub_index,
                };
                let title_style = if sub_index == active_sub {
                    theme.active_style()
                } else if app.hover == Some(target) {
                    th::hovered_style(theme)
                } else {
                    theme.text_secondary_style()
                };

                let mut lines = vec![Line::from(Span::styled(sub.title.as_str(), title_style))];
                let description = sub.description.as_deref().filter(|_| show_descriptions);
                if let Some(description) = description {
                    lines.push(Line::from(Span::styled(description, description_style(theme, sub_index == active_sub))));
                }
                let height = lines.len() as u16;
                let Some(area) = geometry.clip(x, y, width, height) else {
                    continue;
                };
                // the description row must not cover the menu labels
                if area.y < geometry.menu_row as u16 && area.bottom() > geometry.menu_row as u16 {
                    continue;
                }
                frame.render_widget(Paragraph::new(lines), area);
                hit_areas.push((area, target));
            }
        }

        app.hit_areas = hit_areas;
    }
}

fn description_style(theme: &dyn Theme, active: bool) -> Style {
    if active { theme.text_secondary_style() } else { theme.text_muted_style() }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc::UnboundedReceiver;
    use xmb_util::XmbConfig;

    use super::*;
    use crate::port::TransitionRequest;

    fn app() -> (App, UnboundedReceiver<TransitionRequest>) {
        let mut config = XmbConfig::default();
        config.blog_dir = None;
        App::new(&config, Vec::new(), 100).expect("app")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn draw(app: &mut App) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal
            .draw(|frame| CrossMenuComponent.render(frame, frame.area(), app))
            .expect("draw");
        terminal
    }

    #[test]
    fn keys_map_to_single_steps() {
        let (mut app, _requests) = app();
        let mut menu = CrossMenuComponent;
        assert_eq!(
            menu.handle_key_events(&mut app, key(KeyCode::Char('l'))),
            vec![Effect::Move(HorizontalDirection::Right.into())]
        );
        assert_eq!(
            menu.handle_key_events(&mut app, key(KeyCode::Down)),
            vec![Effect::Move(VerticalDirection::Down.into())]
        );
        assert_eq!(menu.handle_key_events(&mut app, key(KeyCode::Char('r'))), vec![Effect::ReloadPosts]);
        assert_eq!(menu.handle_key_events(&mut app, key(KeyCode::Char('q'))), vec![Effect::Quit]);
        assert!(menu.handle_key_events(&mut app, key(KeyCode::Esc)).is_empty());
    }

    #[test]
    fn render_records_hit_areas_at_the_anchor() {
        let (mut app, _requests) = app();
        let terminal = draw(&mut app);

        // anchor column is a quarter of the width, menu row at 45% of the height
        assert_eq!(app.hit_test(25, 13), Some(HitTarget::MenuItem(0)));
        assert_eq!(app.hit_test(43, 13), Some(HitTarget::MenuItem(1)));
        assert_eq!(app.hit_test(25, 16), Some(HitTarget::SubItem { menu_index: 0, sub_index: 0 }));
        assert_eq!(app.hit_test(25, 19), Some(HitTarget::SubItem { menu_index: 0, sub_index: 1 }));

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(25, 14)].symbol(), "A");
        assert_eq!(buffer[(25, 16)].symbol(), "B");
    }

    #[test]
    fn clicks_and_swipes_become_moves() {
        let (mut app, _requests) = app();
        draw(&mut app);
        let mut menu = CrossMenuComponent;

        menu.handle_mouse_events(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 43, 13));
        let effects = menu.handle_mouse_events(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 44, 13));
        assert_eq!(effects, vec![Effect::JumpMenu(1)]);

        menu.handle_mouse_events(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 25, 19));
        let effects = menu.handle_mouse_events(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 25, 19));
        assert_eq!(effects, vec![Effect::JumpSub { menu_index: 0, sub_index: 1 }]);

        menu.handle_mouse_events(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 60, 10));
        let effects = menu.handle_mouse_events(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 50, 10));
        assert_eq!(effects, vec![Effect::Move(HorizontalDirection::Right.into())]);

        let effects = menu.handle_mouse_events(&mut app, mouse(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(effects, vec![Effect::Move(VerticalDirection::Down.into())]);
    }

    #[test]
    fn hover_tracks_the_pointer() {
        let (mut app, _requests) = app();
        draw(&mut app);
        let mut menu = CrossMenuComponent;
        menu.handle_mouse_events(&mut app, mouse(MouseEventKind::Moved, 61, 14));
        assert_eq!(app.hover, Some(HitTarget::MenuItem(2)));
        menu.handle_mouse_events(&mut app, mouse(MouseEventKind::Moved, 0, 0));
        assert_eq!(app.hover, None);
    }
}
