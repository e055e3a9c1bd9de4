//! Shared style definitions for TUI components.

use esq_core::core::session::StatusLevel;
use ratatui::style::{Color, Modifier, Style};

// === Border Styles ===

/// Border style for focused components.
pub const BORDER_FOCUSED: Style = Style::new().fg(Color::Cyan);

/// Border style for unfocused components.
pub const BORDER_UNFOCUSED: Style = Style::new().fg(Color::DarkGray);

/// Get border style based on focus state.
#[inline]
pub fn border_style(focused: bool) -> Style {
    if focused {
        BORDER_FOCUSED
    } else {
        BORDER_UNFOCUSED
    }
}

// === Table Styles ===

/// Style for table header text.
pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Gray)
        .add_modifier(Modifier::BOLD)
}

/// Style for the row under the cursor.
pub fn row_highlight_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::Blue)
        .add_modifier(Modifier::BOLD)
}

/// Style for the `◄` / `►` scroll indicators.
pub const INDICATOR: Style = Style::new().fg(Color::Yellow);

// === Text Styles ===

/// Style for dimmed/hint text.
pub const TEXT_DIM: Style = Style::new().fg(Color::DarkGray);

/// Style for key names in hints.
pub const TEXT_KEY: Style = Style::new().fg(Color::Yellow);

// === Status Styles ===

/// Status bar style for a message level.
pub fn status_style(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => Style::default().fg(Color::White).bg(Color::Blue),
        StatusLevel::Progress => Style::default().fg(Color::Black).bg(Color::Yellow),
        StatusLevel::Success => Style::default().fg(Color::White).bg(Color::Blue),
        StatusLevel::Error => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

// === Input Styles ===

/// Style for the selected query language.
pub fn selected_option_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Style for input text.
pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}
