//! Component system for the cross menu UI.
//!
//! A component owns one area of the screen: it turns terminal input into
//! state changes on [`App`] or into [`Effect`]s for the runtime, and renders
//! itself into the `Rect` it is given.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect};

use crate::app::{App, Effect};

pub(crate) trait Component {
    /// Handle a key press while this component has the input.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse input while this component has the input.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw into `rect`. May record hit areas on `app`.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
