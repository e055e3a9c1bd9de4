use crate::core::time_range::ResolvedTimeRange;

/// Rewrite an ES|QL query so it only sees rows inside `range`.
///
/// - With a `WHERE` keyword, the time condition is AND-ed in right after the
///   first `WHERE`, ahead of the existing condition.
/// - Otherwise a `| WHERE ...` stage goes in place of the first pipe after
///   `FROM`, or at the end when the query has no pipe.
/// - Without a `FROM` keyword there is nowhere to put the filter and `None`
///   is returned; callers send the query unchanged.
///
/// Keywords are matched case-insensitively as whole words, so `nowhere` or a
/// field named `from_host` are left alone. Keywords inside string literals are
/// not recognised as such.
pub fn inject_time_filter(
    query: &str,
    range: &ResolvedTimeRange,
    time_field: &str,
) -> Option<String> {
    let condition = format!(
        "{field} >= \"{start}\" AND {field} <= \"{end}\"",
        field = time_field,
        start = range.start_for_backend(),
        end = range.end_for_backend(),
    );

    if let Some(where_pos) = find_keyword(query, "WHERE") {
        let keyword_end = where_pos + "WHERE".len();
        let rest = query[keyword_end..].trim();
        let rewritten = if rest.is_empty() {
            format!("{} {}", &query[..keyword_end], condition)
        } else {
            format!("{} {} AND {}", &query[..keyword_end], condition, rest)
        };
        return Some(rewritten);
    }

    let from_pos = find_keyword(query, "FROM")?;
    let rewritten = match query[from_pos..].find('|') {
        Some(relative_pipe) => {
            let pipe_pos = from_pos + relative_pipe;
            format!(
                "{} | WHERE {} | {}",
                query[..pipe_pos].trim(),
                condition,
                query[pipe_pos + 1..].trim()
            )
        }
        None => format!("{} | WHERE {}", query.trim(), condition),
    };
    Some(rewritten)
}

/// Byte offset of the first whole-word, case-insensitive `keyword`.
///
/// `keyword` must be upper-case ASCII. ASCII upper-casing keeps byte offsets
/// stable, so the offset is valid in the original string.
fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    let upper = haystack.to_ascii_uppercase();
    let bytes = upper.as_bytes();

    upper.match_indices(keyword).map(|(pos, _)| pos).find(|&pos| {
        let before_ok = pos == 0 || !is_word_byte(bytes[pos - 1]);
        let end = pos + keyword.len();
        let after_ok = end == bytes.len() || !is_word_byte(bytes[end]);
        before_ok && after_ok
    })
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const FILTER: &str = "@timestamp >= \"2024-01-01T00:00:00.000Z\" AND @timestamp <= \"2024-01-01T01:00:00.000Z\"";

    fn range() -> ResolvedTimeRange {
        ResolvedTimeRange {
            start: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("valid date"),
            end: Utc
                .with_ymd_and_hms(2024, 1, 1, 1, 0, 0)
                .single()
                .expect("valid date"),
        }
    }

    fn inject(query: &str) -> Option<String> {
        inject_time_filter(query, &range(), "@timestamp")
    }

    #[test]
    fn test_inserts_stage_before_first_pipe() {
        assert_eq!(
            inject("FROM logs | LIMIT 10").as_deref(),
            Some(format!("FROM logs | WHERE {} | LIMIT 10", FILTER).as_str())
        );
    }

    #[test]
    fn test_extends_existing_where() {
        assert_eq!(
            inject("FROM logs | WHERE status > 200").as_deref(),
            Some(format!("FROM logs | WHERE {} AND status > 200", FILTER).as_str())
        );
    }

    #[test]
    fn test_where_is_case_insensitive() {
        let rewritten = inject("from logs | where status > 200 | limit 5").expect("rewritten");
        assert_eq!(
            rewritten,
            format!("from logs | where {} AND status > 200 | limit 5", FILTER)
        );
    }

    #[test]
    fn test_appends_stage_without_pipe() {
        assert_eq!(
            inject("  FROM logs-*  ").as_deref(),
            Some(format!("FROM logs-* | WHERE {}", FILTER).as_str())
        );
    }

    #[test]
    fn test_multiple_stages_only_first_pipe_replaced() {
        let rewritten = inject("FROM logs | SORT @timestamp DESC | LIMIT 10").expect("rewritten");
        assert_eq!(
            rewritten,
            format!(
                "FROM logs | WHERE {} | SORT @timestamp DESC | LIMIT 10",
                FILTER
            )
        );
    }

    #[test]
    fn test_no_from_is_left_alone() {
        assert_eq!(inject("SHOW INFO"), None);
        assert_eq!(inject("ROW a = 1 | LIMIT 1"), None);
    }

    #[test]
    fn test_keywords_must_be_whole_words() {
        let rewritten = inject("FROM nowhere | KEEP from_host").expect("rewritten");
        assert_eq!(
            rewritten,
            format!("FROM nowhere | WHERE {} | KEEP from_host", FILTER)
        );
    }

    #[test]
    fn test_bare_where_gets_condition_only() {
        assert_eq!(
            inject("FROM logs | WHERE").as_deref(),
            Some(format!("FROM logs | WHERE {}", FILTER).as_str())
        );
    }

    #[test]
    fn test_find_keyword_offsets() {
        assert_eq!(find_keyword("from x", "FROM"), Some(0));
        assert_eq!(find_keyword("x_from from", "FROM"), Some(7));
        assert_eq!(find_keyword("ünïcode FROM y", "FROM"), Some(10));
        assert_eq!(find_keyword("FROMAGE", "FROM"), None);
    }
}
