//! Status bar component.
//!
//! Shows the session status message on the first line and the key hints
//! for the focused pane on the second.

use crossterm::event::KeyEvent;
use esq_core::core::session::{StatusLevel, StatusMessage};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::styles::{TEXT_DIM, TEXT_KEY, status_style};
use super::{Component, Focus};

/// Key binding display item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyBinding {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

const QUERY_BINDINGS: &[KeyBinding] = &[
    KeyBinding::new("Enter", "Run"),
    KeyBinding::new("F2", "ESQL/KQL"),
    KeyBinding::new("Esc", "Clear"),
    KeyBinding::new("Tab", "Results"),
    KeyBinding::new("Ctrl+C", "Quit"),
];

const RESULTS_BINDINGS: &[KeyBinding] = &[
    KeyBinding::new("↑↓", "Rows"),
    KeyBinding::new("←→", "Columns"),
    KeyBinding::new("n/p", "Page"),
    KeyBinding::new("t/T", "Time"),
    KeyBinding::new("/", "Query"),
    KeyBinding::new("?", "Help"),
    KeyBinding::new("q", "Quit"),
];

/// Status bar showing the session message and keybindings.
pub struct StatusBar {
    message: StatusMessage,
    focus: Focus,
}

impl StatusBar {
    pub fn new(message: StatusMessage) -> Self {
        Self {
            message,
            focus: Focus::default(),
        }
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.message = message;
    }

    /// Switch hints to the given pane.
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    pub fn bindings(&self) -> &'static [KeyBinding] {
        match self.focus {
            Focus::Query => QUERY_BINDINGS,
            Focus::Results => RESULTS_BINDINGS,
        }
    }
}

impl Component for StatusBar {
    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool) {
        let style = status_style(self.message.level);
        let status_line = Line::from(Span::styled(format!(" {} ", self.message.text), style));

        let mut spans: Vec<Span> = Vec::new();
        for (i, binding) in self.bindings().iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", TEXT_DIM));
            }
            spans.push(Span::styled(format!(" {} ", binding.key), TEXT_KEY));
            spans.push(Span::raw(binding.action));
        }

        let border = if self.message.level == StatusLevel::Error {
            Style::default().fg(Color::Red)
        } else {
            TEXT_DIM
        };
        let paragraph = Paragraph::new(vec![status_line, Line::from(spans)])
            .block(Block::default().borders(Borders::ALL).border_style(border));

        frame.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, _key: KeyEvent) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> StatusMessage {
        StatusMessage {
            text: "Index: logs-*".to_string(),
            level: StatusLevel::Info,
        }
    }

    #[test]
    fn test_bindings_follow_focus() {
        let mut bar = StatusBar::new(message());
        assert!(bar.bindings().iter().any(|b| b.key == "F2"));

        bar.set_focus(Focus::Results);
        assert!(bar.bindings().iter().any(|b| b.key == "n/p"));
        assert!(!bar.bindings().iter().any(|b| b.key == "F2"));
    }
}
