//! Results table with row selection and the horizontal column window.

use crossterm::event::{KeyCode, KeyEvent};
use esq_core::display::Grid;
use esq_core::display::viewport::{INDICATOR_WIDTH, LEFT_INDICATOR, RIGHT_INDICATOR};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::Component;
use super::styles::{INDICATOR, TEXT_DIM, border_style, header_style, row_highlight_style};
use crate::layout::results::ROW_PAGE_STEP;

const HIGHLIGHT_SYMBOL: &str = "► ";

/// Renders the session's [`Grid`] and owns the row cursor.
#[derive(Debug, Default)]
pub struct ResultsTable {
    grid: Grid,
    caption: String,
    table_state: TableState,
}

impl ResultsTable {
    /// Replace what is shown. The row cursor is clamped to the new row count.
    pub fn set_view(&mut self, grid: Grid, caption: String) {
        self.grid = grid;
        self.caption = caption;
        let rows = self.grid.rows.len();
        match self.table_state.selected() {
            _ if rows == 0 => self.table_state.select(None),
            Some(i) if i >= rows => self.table_state.select(Some(rows - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Move the cursor back to the first row of a freshly installed result.
    pub fn reset_selection(&mut self) {
        let first = (!self.grid.rows.is_empty()).then_some(0);
        self.table_state.select(first);
        *self.table_state.offset_mut() = 0;
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    fn title(&self) -> String {
        match self.selected() {
            Some(row) => format!(" Results (row {}/{}) ", row + 1, self.row_count()),
            None => " Results ".to_string(),
        }
    }

    fn row_count(&self) -> usize {
        self.grid.rows.len()
    }

    fn move_by(&mut self, delta: isize) {
        let rows = self.row_count();
        if rows == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let target = (current + delta).clamp(0, rows as isize - 1);
        self.table_state.select(Some(target as usize));
    }

    fn select_first(&mut self) {
        if self.row_count() > 0 {
            self.table_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        let rows = self.row_count();
        if rows > 0 {
            self.table_state.select(Some(rows - 1));
        }
    }

    fn indicator_cell(symbol: &'static str) -> Cell<'static> {
        Cell::from(Span::styled(format!(" {} ", symbol), INDICATOR))
    }

    fn build_table(&self) -> Table<'static> {
        let grid = &self.grid;
        let mut constraints: Vec<Constraint> = Vec::with_capacity(grid.widths.len() + 2);
        if grid.show_left_indicator {
            constraints.push(Constraint::Length(INDICATOR_WIDTH as u16));
        }
        constraints.extend(grid.widths.iter().map(|&w| Constraint::Length(w as u16)));
        if grid.show_right_indicator {
            constraints.push(Constraint::Length(INDICATOR_WIDTH as u16));
        }

        let framed = |cells: Vec<Cell<'static>>| -> Vec<Cell<'static>> {
            let mut framed = Vec::with_capacity(cells.len() + 2);
            if grid.show_left_indicator {
                framed.push(Self::indicator_cell(LEFT_INDICATOR));
            }
            framed.extend(cells);
            if grid.show_right_indicator {
                framed.push(Self::indicator_cell(RIGHT_INDICATOR));
            }
            framed
        };

        let header = Row::new(framed(
            grid.header.iter().cloned().map(Cell::from).collect(),
        ))
        .style(header_style())
        .bottom_margin(1);

        let rows: Vec<Row> = grid
            .rows
            .iter()
            .map(|row| Row::new(framed(row.iter().cloned().map(Cell::from).collect())))
            .collect();

        Table::new(rows, constraints)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(row_highlight_style())
            .highlight_symbol(HIGHLIGHT_SYMBOL)
    }
}

impl Component for ResultsTable {
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(border_style(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [caption_area, table_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(self.caption.clone(), TEXT_DIM))),
            caption_area,
        );

        if self.grid.header.is_empty() {
            return;
        }
        let table = self.build_table();
        frame.render_stateful_widget(table, table_area, &mut self.table_state);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(1),
            KeyCode::PageUp => self.move_by(-(ROW_PAGE_STEP as isize)),
            KeyCode::PageDown => self.move_by(ROW_PAGE_STEP as isize),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.select_last(),
            _ => return false,
        }
        true
    }
}
