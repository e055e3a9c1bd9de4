//! Layout constants for esq.

/// Main screen split.
pub mod main {
    /// Query editor and time range row. Tall enough for every preset.
    pub const QUERY_SECTION_HEIGHT: u16 = 11;

    /// Status bar height in rows (message plus key hints).
    pub const STATUS_BAR_HEIGHT: u16 = 4;

    /// Share of the query row given to the editor; the rest is the time range list.
    pub const QUERY_EDITOR_PERCENT: u16 = 72;
}

/// Results pane.
pub mod results {
    /// Rows moved by PgUp/PgDn.
    pub const ROW_PAGE_STEP: usize = 10;
}

/// Event loop.
pub mod timing {
    /// Poll interval; bounds how quickly a finished search is drawn.
    pub const TICK_RATE_MS: u64 = 100;
}
