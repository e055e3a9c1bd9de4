//! Query compilation.
//!
//! Turns what the user typed, plus the active time window, into the exact
//! request handed to the search backend. KQL text becomes a structured
//! filter object; ES|QL text is rewritten in place.

mod esql;
mod kql;

pub use esql::inject_time_filter;
pub use kql::build_filter;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::time_range::ResolvedTimeRange;

/// Server-side allowance for structured searches, in seconds.
pub const STRUCTURED_TIMEOUT_SECS: u64 = 300;

/// Allowance for ES|QL evaluation, in seconds.
pub const TEXT_QUERY_TIMEOUT_SECS: u64 = 600;

/// Default timestamp field used for time filtering and sorting.
pub const DEFAULT_TIME_FIELD: &str = "@timestamp";

/// Active query language. Exactly one is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryLanguage {
    /// Piped ES|QL text, time filter injected into the text.
    #[default]
    Esql,
    /// Free-text query string, time filter added as a structured clause.
    Kql,
}

impl QueryLanguage {
    pub fn label(self) -> &'static str {
        match self {
            QueryLanguage::Esql => "ESQL",
            QueryLanguage::Kql => "KQL",
        }
    }

    /// The other language.
    pub fn toggle(self) -> Self {
        match self {
            QueryLanguage::Esql => QueryLanguage::Kql,
            QueryLanguage::Kql => QueryLanguage::Esql,
        }
    }

    /// Only structured searches understand `from`/`size` paging.
    pub fn supports_paging(self) -> bool {
        matches!(self, QueryLanguage::Kql)
    }
}

impl std::fmt::Display for QueryLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for QueryLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "esql" | "es|ql" => Ok(QueryLanguage::Esql),
            "kql" => Ok(QueryLanguage::Kql),
            other => Err(format!(
                "unknown query language '{}' (expected esql or kql)",
                other
            )),
        }
    }
}

/// A submitted query: trimmed, non-empty text plus its language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    text: String,
    language: QueryLanguage,
}

impl QuerySpec {
    /// Returns `None` when `text` is empty after trimming.
    pub fn new(text: &str, language: QueryLanguage) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            language,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> QueryLanguage {
        self.language
    }
}

/// Response body format requested from the ES|QL endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Csv => "csv",
            ResponseFormat::Tsv => "tsv",
        }
    }
}

/// Structured search request (`POST /{index}/_search`).
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredSearch {
    pub index: String,
    pub query: Value,
    pub size: usize,
    pub from: usize,
    pub sort: Vec<Value>,
    pub timeout_secs: u64,
}

impl StructuredSearch {
    /// Request body sent to the cluster.
    pub fn body(&self) -> Value {
        serde_json::json!({
            "query": self.query,
            "size": self.size,
            "from": self.from,
            "sort": self.sort,
        })
    }
}

/// ES|QL request (`POST /_query`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    pub query: String,
    pub format: ResponseFormat,
    pub timeout_secs: u64,
    /// False when no `FROM` was found and the query was sent unfiltered.
    pub time_filter_applied: bool,
}

/// What the compiler hands to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    Structured(StructuredSearch),
    Text(TextQuery),
}

impl BackendRequest {
    pub fn language(&self) -> QueryLanguage {
        match self {
            BackendRequest::Structured(_) => QueryLanguage::Kql,
            BackendRequest::Text(_) => QueryLanguage::Esql,
        }
    }
}

/// Everything besides the query text that shapes a request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub index: String,
    pub page_offset: usize,
    pub page_size: usize,
    pub time_field: String,
    pub response_format: ResponseFormat,
    /// Explicit sort; `None` sorts by the time field, newest first.
    pub sort: Option<Vec<Value>>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            index: "*".to_string(),
            page_offset: 0,
            page_size: 100,
            time_field: DEFAULT_TIME_FIELD.to_string(),
            response_format: ResponseFormat::Json,
            sort: None,
        }
    }
}

/// Compile a query into a backend request.
///
/// No syntax checking happens here; malformed queries come back from the
/// backend as [`crate::error::SearchError::QuerySyntax`].
pub fn compile(
    spec: &QuerySpec,
    range: Option<&ResolvedTimeRange>,
    params: &SearchParams,
) -> BackendRequest {
    match spec.language() {
        QueryLanguage::Kql => {
            let sort = params
                .sort
                .clone()
                .unwrap_or_else(|| vec![newest_first(&params.time_field)]);
            BackendRequest::Structured(StructuredSearch {
                index: params.index.clone(),
                query: build_filter(spec.text(), range, &params.time_field),
                size: params.page_size,
                from: params.page_offset,
                sort,
                timeout_secs: STRUCTURED_TIMEOUT_SECS,
            })
        }
        QueryLanguage::Esql => {
            let (query, time_filter_applied) = match range {
                Some(range) => match inject_time_filter(spec.text(), range, &params.time_field) {
                    Some(rewritten) => (rewritten, true),
                    None => {
                        log::debug!("No FROM clause found, sending ES|QL query without time filter");
                        (spec.text().to_string(), false)
                    }
                },
                None => (spec.text().to_string(), false),
            };
            BackendRequest::Text(TextQuery {
                query,
                format: params.response_format,
                timeout_secs: TEXT_QUERY_TIMEOUT_SECS,
                time_filter_applied,
            })
        }
    }
}

/// `{"<field>": {"order": "desc"}}`
fn newest_first(time_field: &str) -> Value {
    let mut sort = serde_json::Map::new();
    sort.insert(
        time_field.to_string(),
        serde_json::json!({ "order": "desc" }),
    );
    Value::Object(sort)
}
