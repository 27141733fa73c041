//! Top-level view: the cross menu, the hint bar, and the reader overlay
//! when a post is open. Input goes to the overlay while it is visible.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use crate::app::{App, Effect};
use crate::ui::components::{Component, CrossMenuComponent, HintBarComponent, ReaderComponent};

#[derive(Debug, Default)]
pub struct MainView {
    menu_view: CrossMenuComponent,
    reader_view: ReaderComponent,
    hint_bar_view: HintBarComponent,
}

impl Component for MainView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.reader.is_some() {
            return self.reader_view.handle_key_events(app, key);
        }
        self.menu_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if app.reader.is_some() {
            return self.reader_view.handle_mouse_events(app, mouse);
        }
        self.menu_view.handle_mouse_events(app, mouse)
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [menu_area, hints_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(rect);
        self.menu_view.render(frame, menu_area, app);
        self.hint_bar_view.render(frame, hints_area, app);
        if app.reader.is_some() {
            self.reader_view.render(frame, menu_area, app);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};
    use xmb_util::{BlogPost, XmbConfig};

    use super::*;

    #[tokio::test]
    async fn reader_takes_input_until_closed() {
        let mut config = XmbConfig::default();
        config.blog_dir = None;
        config.menu.rotate_left(2);
        let post = BlogPost::from_markdown("hello.md", "---\ntitle: Hello\n---\nline\n");
        let (mut app, _requests) = App::new(&config, vec![post], 100).expect("app");
        let mut view = MainView::default();

        let effects = view.handle_key_events(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(effects.is_empty());
        assert!(app.reader.is_some());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).expect("draw");

        let effects = view.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(effects.is_empty(), "q closes the reader before it quits");
        assert!(app.reader.is_none());
        let effects = view.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(effects, vec![Effect::Quit]);
    }
}
