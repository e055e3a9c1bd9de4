//! Help overlay component.
//!
//! Displays a modal overlay showing all available keybindings.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::styles::TEXT_DIM;

/// Help overlay showing keybindings.
pub struct HelpOverlay;

impl HelpOverlay {
    const GLOBAL_KEYS: &'static [(&'static str, &'static str)] = &[
        ("Ctrl+C", "Quit application"),
        ("Tab / Shift+Tab", "Switch between query and results"),
        ("F2", "Toggle ESQL / KQL"),
    ];

    const QUERY_KEYS: &'static [(&'static str, &'static str)] = &[
        ("Enter", "Run query"),
        ("Esc", "Clear query"),
        ("← / →", "Move cursor"),
        ("Home / End", "Start / end of line"),
    ];

    const RESULTS_KEYS: &'static [(&'static str, &'static str)] = &[
        ("↑ / k  ↓ / j", "Move between rows"),
        ("PgUp / PgDn", "Move ten rows"),
        ("g / G", "First / last row"),
        ("← / h  → / l", "Scroll columns"),
        ("n / p", "Next / previous page (KQL)"),
        ("t / T", "Next / previous time range"),
        ("/ or i", "Edit query"),
        ("Esc or x", "Cancel running query"),
        ("q", "Quit application"),
        ("?", "Toggle help"),
    ];

    /// Render the help overlay centered on screen.
    pub fn render(frame: &mut Frame, area: Rect) {
        let popup_area = Self::centered_rect(60, 80, area);
        frame.render_widget(Clear, popup_area);

        let mut lines: Vec<Line> = vec![Line::from("")];
        Self::push_section(&mut lines, "Global", Self::GLOBAL_KEYS);
        Self::push_section(&mut lines, "Query", Self::QUERY_KEYS);
        Self::push_section(&mut lines, "Results", Self::RESULTS_KEYS);
        lines.push(Line::from(Span::styled(
            "  Press ? or Esc to close",
            TEXT_DIM,
        )));

        let help_text = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Help ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left);

        frame.render_widget(help_text, popup_area);
    }

    fn push_section(lines: &mut Vec<Line<'static>>, title: &'static str, keys: &[(&str, &str)]) {
        lines.push(Line::from(Span::styled(
            format!("  {}", title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from("  ──────────────────────────────────"));
        for (key, action) in keys {
            lines.push(Self::format_keybinding(key, action));
        }
        lines.push(Line::from(""));
    }

    fn format_keybinding(key: &str, action: &str) -> Line<'static> {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(
                format!("{:<16}", key),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(action.to_string()),
        ])
    }

    fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
        let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);

        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = HelpOverlay::centered_rect(60, 80, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 40);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 5);
    }
}
