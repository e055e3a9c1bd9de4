//! Column widths and the horizontal viewport over wide tables.
//!
//! At most [`COLUMNS_PER_SCREEN`] columns are shown at once; the viewport
//! offset picks the first visible column.

use std::ops::Range;

use crate::core::results::TabularResult;
use crate::utils::text::{display_width, pad_to_width, truncate_text_unicode};

pub const COLUMNS_PER_SCREEN: usize = 6;
pub const MIN_COLUMN_WIDTH: usize = 15;
pub const MAX_COLUMN_WIDTH: usize = 100;
/// Added to the widest cell: a space either side plus the divider.
pub const COLUMN_PADDING: usize = 3;
/// Width reserved for a scroll indicator column.
pub const INDICATOR_WIDTH: usize = 3;
pub const LEFT_INDICATOR: &str = "◄";
pub const RIGHT_INDICATOR: &str = "►";

/// Horizontal scroll position. Reset whenever a new result is installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
}

impl Viewport {
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Largest valid offset for a table with `column_count` columns.
    pub fn max_offset(column_count: usize) -> usize {
        column_count.saturating_sub(COLUMNS_PER_SCREEN)
    }

    /// Returns whether the offset moved.
    pub fn scroll_right(&mut self, column_count: usize) -> bool {
        if self.offset < Self::max_offset(column_count) {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    /// Returns whether the offset moved.
    pub fn scroll_left(&mut self) -> bool {
        if self.offset > 0 {
            self.offset -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Visible column indices for a table with `column_count` columns.
    pub fn visible_range(&self, column_count: usize) -> Range<usize> {
        let start = self.offset.min(column_count);
        start..(start + COLUMNS_PER_SCREEN).min(column_count)
    }
}

/// Display width for each column in `visible`: widest header or cell plus
/// padding, clamped to `[MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH]`.
pub fn compute_column_widths(
    columns: &[String],
    rows: &[Vec<String>],
    visible: Range<usize>,
) -> Vec<usize> {
    visible
        .filter(|&i| i < columns.len())
        .map(|i| {
            let widest = rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| display_width(cell))
                .fold(display_width(&columns[i]), usize::max);
            (widest + COLUMN_PADDING).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// ` text ` padded to `width`. Text longer than `width - 3` is cut to
/// `width - 6` columns followed by `...`.
pub fn format_cell(text: &str, width: usize) -> String {
    let inner = width.saturating_sub(2);
    let text = if display_width(text) > width.saturating_sub(COLUMN_PADDING) {
        truncate_text_unicode(text, width.saturating_sub(COLUMN_PADDING))
    } else {
        text.to_string()
    };
    format!(" {} ", pad_to_width(&text, inner))
}

/// Renderable slice of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    /// Header cells, padded but never truncated.
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub widths: Vec<usize>,
    pub visible: Range<usize>,
    pub show_left_indicator: bool,
    pub show_right_indicator: bool,
}

/// Slice `table` through `viewport` and format every visible cell.
pub fn render_grid(table: &TabularResult, viewport: &Viewport) -> Grid {
    let column_count = table.columns.len();
    let visible = viewport.visible_range(column_count);
    let widths = compute_column_widths(&table.columns, &table.rows, visible.clone());

    let header = table.columns[visible.clone()]
        .iter()
        .zip(&widths)
        .map(|(name, &width)| format!(" {} ", pad_to_width(name, width.saturating_sub(2))))
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            visible
                .clone()
                .zip(&widths)
                .map(|(i, &width)| format_cell(row.get(i).map(String::as_str).unwrap_or(""), width))
                .collect()
        })
        .collect();

    Grid {
        header,
        rows,
        widths,
        show_left_indicator: visible.start > 0,
        show_right_indicator: visible.end < column_count,
        visible,
    }
}
