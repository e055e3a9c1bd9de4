//! UI Components for esq.
//!
//! Each component owns its own view state and draws into the area it is
//! given; the session state it displays is pushed in by the app.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

mod help_overlay;
mod query_input;
mod results_table;
mod status_bar;
pub mod styles;
mod time_range_panel;

pub use help_overlay::HelpOverlay;
pub use query_input::QueryInput;
pub use results_table::ResultsTable;
pub use status_bar::StatusBar;
pub use time_range_panel::TimeRangePanel;

/// Pane receiving keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Query,
    Results,
}

impl Focus {
    /// The other pane.
    pub fn toggle(self) -> Self {
        match self {
            Focus::Query => Focus::Results,
            Focus::Results => Focus::Query,
        }
    }
}

/// Common trait for all UI components.
pub trait Component {
    /// Draw the component within the given area.
    /// Takes `&mut self` to support stateful widgets like TableState.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool);

    /// Handle keyboard input. Returns true if the event was consumed.
    fn handle_key(&mut self, key: KeyEvent) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_defaults_to_query_and_toggles() {
        assert_eq!(Focus::default(), Focus::Query);
        assert_eq!(Focus::Query.toggle(), Focus::Results);
        assert_eq!(Focus::Results.toggle(), Focus::Query);
    }
}
