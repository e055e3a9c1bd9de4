use serde_json::{Value, json};

use crate::core::time_range::ResolvedTimeRange;

/// Build the `query` object for a structured search.
///
/// A range clause on `time_field` and a `query_string` clause for the text
/// are AND-ed together when both exist; a lone clause is used as is, and
/// neither falls back to `match_all`.
pub fn build_filter(text: &str, range: Option<&ResolvedTimeRange>, time_field: &str) -> Value {
    let mut clauses = Vec::with_capacity(2);

    if let Some(range) = range {
        let mut bounds = serde_json::Map::new();
        bounds.insert(
            time_field.to_string(),
            json!({
                "gte": range.start_for_backend(),
                "lte": range.end_for_backend(),
            }),
        );
        clauses.push(json!({ "range": Value::Object(bounds) }));
    }

    let text = text.trim();
    if !text.is_empty() {
        clauses.push(json!({ "query_string": { "query": text } }));
    }

    match clauses.len() {
        0 => json!({ "match_all": {} }),
        1 => clauses.remove(0),
        _ => json!({ "bool": { "must": clauses } }),
    }
}
