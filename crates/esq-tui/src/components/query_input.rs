//! Query editor with the ESQL/KQL language selector.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use esq_core::core::query::QueryLanguage;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use super::Component;
use super::styles::{TEXT_DIM, border_style, input_text_style, selected_option_style};

const PROMPT: &str = "> ";

/// Single-line query buffer. The cursor is a char index into the buffer.
#[derive(Debug, Default)]
pub struct QueryInput {
    buffer: String,
    cursor: usize,
    language: QueryLanguage,
}

impl QueryInput {
    pub fn new(language: QueryLanguage) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn language(&self) -> QueryLanguage {
        self.language
    }

    pub fn toggle_language(&mut self) {
        self.language = self.language.toggle();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Text to show in `available` columns and the cursor column within it.
    /// Leading characters are skipped once the cursor would fall off the right edge.
    fn visible_window(&self, available: usize) -> (String, usize) {
        let chars: Vec<char> = self.buffer.chars().collect();
        let width_of = |c: &char| c.width().unwrap_or(0);

        let mut start = 0;
        let mut cursor_col: usize = chars[..self.cursor].iter().map(width_of).sum();
        while cursor_col >= available.max(1) && start < self.cursor {
            cursor_col -= width_of(&chars[start]);
            start += 1;
        }
        (chars[start..].iter().collect(), cursor_col)
    }

    fn language_line(&self) -> Line<'static> {
        let option = |language: QueryLanguage| {
            let (marker, style) = if language == self.language {
                ("(•)", selected_option_style())
            } else {
                ("( )", TEXT_DIM)
            };
            Span::styled(format!("{} {}  ", marker, language.label()), style)
        };

        Line::from(vec![
            Span::raw("Language: "),
            option(QueryLanguage::Esql),
            option(QueryLanguage::Kql),
            Span::styled("[F2 to toggle]", TEXT_DIM),
        ])
    }
}

impl Component for QueryInput {
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title(" Query ")
            .borders(Borders::ALL)
            .border_style(border_style(focused));
        let inner = block.inner(area);

        let available = (inner.width as usize).saturating_sub(PROMPT.len());
        let (visible, cursor_col) = self.visible_window(available);

        let lines = vec![
            self.language_line(),
            Line::from(""),
            Line::from(vec![
                Span::styled(PROMPT, selected_option_style()),
                Span::styled(visible, input_text_style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if focused && inner.height > 2 {
            let x = inner.x + (PROMPT.len() + cursor_col).min(inner.width as usize) as u16;
            frame.set_cursor_position(Position::new(x, inner.y + 2));
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.move_left();
                true
            }
            KeyCode::Right => {
                self.move_right();
                true
            }
            KeyCode::Home => {
                self.move_home();
                true
            }
            KeyCode::End => {
                self.move_end();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(input: &mut QueryInput, text: &str) {
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_and_editing() {
        let mut input = QueryInput::new(QueryLanguage::Kql);
        type_text(&mut input, "status:500");
        assert_eq!(input.text(), "status:500");
        assert_eq!(input.cursor, 10);

        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.text(), "tatus:500");

        input.handle_key(key(KeyCode::End));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.text(), "tatus:50");

        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Char('x')));
        assert_eq!(input.text(), "tatus:5x0");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut input = QueryInput::default();
        type_text(&mut input, "名前");
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.text(), "前");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut input = QueryInput::default();
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Backspace));
        input.handle_key(key(KeyCode::Right));
        assert_eq!(input.cursor, 0);
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_control_chars_are_not_inserted() {
        let mut input = QueryInput::default();
        let consumed = input.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!consumed);
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut input = QueryInput::new(QueryLanguage::Esql);
        type_text(&mut input, "FROM logs");
        input.toggle_language();
        assert_eq!(input.language(), QueryLanguage::Kql);
        input.clear();
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_visible_window_follows_cursor() {
        let mut input = QueryInput::default();
        type_text(&mut input, "abcdefghij");

        let (visible, col) = input.visible_window(20);
        assert_eq!(visible, "abcdefghij");
        assert_eq!(col, 10);

        let (visible, col) = input.visible_window(5);
        assert_eq!(visible, "ghij");
        assert_eq!(col, 4);
    }
}
