//! Time range preset list.

use crossterm::event::KeyEvent;
use esq_core::core::time_range::TimeRangePreset;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Component;
use super::styles::{TEXT_DIM, border_style, selected_option_style};

/// Lists every preset and marks the active one with `>`.
#[derive(Debug, Default)]
pub struct TimeRangePanel {
    current: TimeRangePreset,
}

impl TimeRangePanel {
    pub fn set_current(&mut self, preset: TimeRangePreset) {
        self.current = preset;
    }

    fn lines(&self) -> Vec<Line<'static>> {
        TimeRangePreset::ALL
            .iter()
            .map(|&preset| {
                if preset == self.current {
                    Line::from(Span::styled(
                        format!("> {}", preset.label()),
                        selected_option_style(),
                    ))
                } else {
                    Line::from(Span::styled(format!("  {}", preset.label()), TEXT_DIM))
                }
            })
            .collect()
    }
}

impl Component for TimeRangePanel {
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title(" Time Range (t/T) ")
            .borders(Borders::ALL)
            .border_style(border_style(focused));
        frame.render_widget(Paragraph::new(self.lines()).block(block), area);
    }

    fn handle_key(&mut self, _key: KeyEvent) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_only_current_preset() {
        let mut panel = TimeRangePanel::default();
        panel.set_current(TimeRangePreset::LastHour);

        let rendered: Vec<String> = panel.lines().iter().map(|l| l.to_string()).collect();
        assert_eq!(rendered.len(), TimeRangePreset::ALL.len());
        assert_eq!(rendered[2], "> Last 1 hour");
        assert_eq!(rendered.iter().filter(|l| l.starts_with('>')).count(), 1);
        assert_eq!(rendered[0], "  Last 15 minutes");
    }
}
