//! Result normalization.
//!
//! Both response shapes are flattened into a [`TabularResult`]: ordered
//! column names, rows of display strings, and a total hit count. Every row
//! has exactly one cell per column.

use serde_json::Value;

use crate::api::models::{EsqlResponse, Hit, SearchResponse};

/// Raw backend response, tagged by the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Structured(SearchResponse),
    Text(EsqlResponse),
}

/// Canonical table handed to the renderer. Replaced wholesale per query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_hits: u64,
}

impl TabularResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Normalize a raw response and drop columns that are empty everywhere.
pub fn normalize(raw: &RawResponse) -> TabularResult {
    let mut table = match raw {
        RawResponse::Structured(response) => from_hits(response),
        RawResponse::Text(response) => from_esql(response),
    };
    elide_empty_columns(&mut table);
    table
}

/// Columns come from the first hit's `_source`, in document order, with
/// `_id` and `_index` placed first when the source does not carry them.
/// Fields that only later hits have are not shown.
pub fn from_hits(response: &SearchResponse) -> TabularResult {
    let hits = &response.hits.hits;
    let total_hits = response.hits.total_count();

    let Some(first) = hits.first() else {
        return TabularResult {
            total_hits,
            ..TabularResult::default()
        };
    };

    let mut columns: Vec<String> = first.source.keys().cloned().collect();
    if !columns.iter().any(|c| c == "_id") {
        columns.insert(0, "_id".to_string());
    }
    if !columns.iter().any(|c| c == "_index") {
        let position = columns.len().min(1);
        columns.insert(position, "_index".to_string());
    }

    let rows = hits
        .iter()
        .map(|hit| columns.iter().map(|column| hit_cell(hit, column)).collect())
        .collect();

    TabularResult {
        columns,
        rows,
        total_hits,
    }
}

fn hit_cell(hit: &Hit, column: &str) -> String {
    if let Some(value) = hit.source.get(column) {
        return stringify_value(value);
    }
    match column {
        "_id" => hit.id.clone().unwrap_or_default(),
        "_index" => hit.index.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Explicit columns and value rows. Ragged rows are padded or cut.
pub fn from_esql(response: &EsqlResponse) -> TabularResult {
    if response.columns.is_empty() || response.values.is_empty() {
        return TabularResult::default();
    }

    let columns: Vec<String> = response.columns.iter().map(|c| c.name.clone()).collect();
    let width = columns.len();

    let rows: Vec<Vec<String>> = response
        .values
        .iter()
        .map(|values| {
            let mut row: Vec<String> = values.iter().take(width).map(stringify_value).collect();
            row.resize(width, String::new());
            row
        })
        .collect();

    TabularResult {
        total_hits: rows.len() as u64,
        columns,
        rows,
    }
}

/// Display text for a JSON value: strings verbatim, null as empty,
/// containers as compact JSON.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Drop columns whose cells are blank in every row.
///
/// Skipped entirely when it would remove every column, so a table with rows
/// never ends up with nothing to show.
pub fn elide_empty_columns(table: &mut TabularResult) {
    if table.columns.is_empty() {
        return;
    }

    let keep: Vec<bool> = (0..table.columns.len())
        .map(|i| {
            table
                .rows
                .iter()
                .any(|row| row.get(i).is_some_and(|cell| !cell.trim().is_empty()))
        })
        .collect();

    if keep.iter().all(|k| *k) || keep.iter().all(|k| !*k) {
        return;
    }

    table.columns = retain_marked(std::mem::take(&mut table.columns), &keep);
    for row in &mut table.rows {
        *row = retain_marked(std::mem::take(row), &keep);
    }
}

fn retain_marked(items: Vec<String>, keep: &[bool]) -> Vec<String> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}
