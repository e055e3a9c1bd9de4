pub mod caption;
pub mod viewport;

pub use caption::{CaptionContext, caption};
pub use viewport::{
    COLUMNS_PER_SCREEN, Grid, Viewport, compute_column_widths, format_cell, render_grid,
};
