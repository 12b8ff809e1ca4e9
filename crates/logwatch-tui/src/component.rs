//! The `Component` trait implemented by every screen and the modal.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// A drawable piece of the UI that reacts to keys and dispatched actions.
///
/// Components never call the backend. They return actions, and the app
/// turns those into fetches whose results come back through `update`.
pub trait Component: Send {
    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// React to a broadcast action, usually a `Loaded` payload. Screens
    /// that are not visible still receive these.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Whether this is the visible screen; drives its tab highlight.
    fn focused(&self) -> bool {
        false
    }

    fn set_focused(&mut self, _focused: bool) {}

    /// True while the component is editing text and wants every key,
    /// including the ones normally bound globally.
    fn captures_input(&self) -> bool {
        false
    }
}
