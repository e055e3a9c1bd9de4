//! The one-line summary shown under the results table.

use crate::core::query::QueryLanguage;
use crate::display::viewport::COLUMNS_PER_SCREEN;

/// Everything the caption depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionContext {
    /// Language of the query that produced the current result.
    pub language: QueryLanguage,
    pub has_searched: bool,
    pub row_count: usize,
    pub column_count: usize,
    pub total_hits: u64,
    /// Offset of the first row within the full hit list.
    pub page_offset: usize,
    pub viewport_offset: usize,
}

pub fn caption(ctx: &CaptionContext) -> String {
    if !ctx.has_searched {
        return "No results".to_string();
    }
    if ctx.row_count == 0 {
        return "No results found".to_string();
    }

    let scroll_info = if ctx.column_count > COLUMNS_PER_SCREEN {
        format!(
            " | Columns {}-{} of {} (←/→ to scroll)",
            ctx.viewport_offset + 1,
            (ctx.viewport_offset + COLUMNS_PER_SCREEN).min(ctx.column_count),
            ctx.column_count
        )
    } else {
        String::new()
    };

    match ctx.language {
        QueryLanguage::Kql => {
            let start = ctx.page_offset + 1;
            let end = ((ctx.page_offset + ctx.row_count) as u64).min(ctx.total_hits);
            format!(
                "Showing {}-{} of {} results{} | Press 'n' for next page, 'p' for previous, 'q' to quit",
                start, end, ctx.total_hits, scroll_info
            )
        }
        QueryLanguage::Esql => format!(
            "Showing {} results{} | Press 'q' to quit",
            ctx.row_count, scroll_info
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(language: QueryLanguage) -> CaptionContext {
        CaptionContext {
            language,
            has_searched: true,
            row_count: 100,
            column_count: 4,
            total_hits: 250,
            page_offset: 200,
            viewport_offset: 0,
        }
    }

    #[test]
    fn test_before_first_search() {
        let ctx = CaptionContext {
            has_searched: false,
            ..ctx(QueryLanguage::Kql)
        };
        assert_eq!(caption(&ctx), "No results");
    }

    #[test]
    fn test_empty_result() {
        let ctx = CaptionContext {
            row_count: 0,
            ..ctx(QueryLanguage::Esql)
        };
        assert_eq!(caption(&ctx), "No results found");
    }

    #[test]
    fn test_kql_caption_clamps_end_to_total() {
        let ctx = CaptionContext {
            row_count: 50,
            ..ctx(QueryLanguage::Kql)
        };
        assert_eq!(
            caption(&ctx),
            "Showing 201-250 of 250 results | Press 'n' for next page, 'p' for previous, 'q' to quit"
        );
    }

    #[test]
    fn test_esql_caption_with_scroll_info() {
        let ctx = CaptionContext {
            row_count: 12,
            column_count: 9,
            viewport_offset: 2,
            ..ctx(QueryLanguage::Esql)
        };
        assert_eq!(
            caption(&ctx),
            "Showing 12 results | Columns 3-8 of 9 (←/→ to scroll) | Press 'q' to quit"
        );
    }

    #[test]
    fn test_scroll_info_only_for_wide_tables() {
        let ctx = CaptionContext {
            column_count: 6,
            ..ctx(QueryLanguage::Esql)
        };
        assert!(!caption(&ctx).contains("Columns"));
    }
}
