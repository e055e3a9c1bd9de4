use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Structured search (`_search`) models
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: HitsEnvelope,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

impl HitsEnvelope {
    /// Reported total, or the number of hits when the cluster omitted it.
    pub fn total_count(&self) -> u64 {
        match &self.total {
            Some(TotalHits::Count(n)) => *n,
            Some(TotalHits::Detailed { value, .. }) => *value,
            None => self.hits.len() as u64,
        }
    }
}

/// `hits.total` is a bare number on old clusters and `{value, relation}` on new ones.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Detailed {
        value: u64,
        #[serde(default)]
        relation: Option<String>,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Hit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_index", default)]
    pub index: Option<String>,
    /// Source fields in document order.
    #[serde(rename = "_source", default)]
    pub source: IndexMap<String, Value>,
}

// ES|QL (`_query`) models
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct EsqlResponse {
    #[serde(default)]
    pub columns: Vec<EsqlColumn>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EsqlColumn {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,
}

impl EsqlResponse {
    /// Parse a `format=csv` or `format=tsv` body: a header record, then one
    /// row per record.
    ///
    /// Double-quoted fields may contain the delimiter, line breaks and `""`
    /// escapes. Every cell comes back as a JSON string.
    pub fn from_delimited(body: &str, delimiter: char) -> Self {
        let mut records = read_records(body, delimiter).into_iter();

        let Some(header) = records.next() else {
            return Self::default();
        };

        let columns = header
            .into_iter()
            .map(|name| EsqlColumn {
                name,
                data_type: None,
            })
            .collect();

        let values = records
            .map(|record| record.into_iter().map(Value::String).collect())
            .collect();

        Self { columns, values }
    }
}

/// Split a delimited body into records. Blank lines are skipped.
fn read_records(body: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = body.chars().peekable();

    let mut end_record = |record: &mut Vec<String>, field: &mut String, quoted: bool| {
        if record.is_empty() && field.trim().is_empty() && !quoted {
            field.clear();
            return;
        }
        record.push(std::mem::take(field));
        records.push(std::mem::take(record));
    };

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            _ if in_quotes => field.push(c),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                end_record(&mut record, &mut field, quoted);
                quoted = false;
            }
            c if c == delimiter => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            c => field.push(c),
        }
    }
    end_record(&mut record, &mut field, quoted);
    records
}

/// Pull a human-readable reason out of an Elasticsearch error body.
///
/// Handles `{"error": "text"}`, `{"error": {"reason": ...}}` and falls back to
/// the first `root_cause` reason. Returns `None` for anything else.
pub fn error_reason(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;

    if let Some(text) = error.as_str() {
        return Some(text.to_string());
    }

    error
        .get("reason")
        .and_then(Value::as_str)
        .or_else(|| {
            error
                .get("root_cause")
                .and_then(Value::as_array)
                .and_then(|causes| causes.first())
                .and_then(|cause| cause.get("reason"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_keeps_source_order() {
        let body = json!({
            "hits": {
                "total": {"value": 42, "relation": "eq"},
                "hits": [
                    {"_id": "a1", "_index": "logs", "_source": {"zeta": 1, "alpha": "x", "mid": null}}
                ]
            }
        });
        let response: SearchResponse = serde_json::from_value(body).expect("valid response");
        let hit = &response.hits.hits[0];
        let keys: Vec<&str> = hit.source.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(hit.id.as_deref(), Some("a1"));
        assert_eq!(response.hits.total_count(), 42);
    }

    #[test]
    fn test_total_accepts_scalar_and_missing() {
        let scalar: SearchResponse =
            serde_json::from_value(json!({"hits": {"total": 7, "hits": []}})).expect("scalar");
        assert_eq!(scalar.hits.total_count(), 7);

        let missing: SearchResponse = serde_json::from_value(json!({
            "hits": {"hits": [{"_id": "1", "_source": {}}, {"_id": "2", "_source": {}}]}
        }))
        .expect("missing total");
        assert_eq!(missing.hits.total_count(), 2);

        let empty: SearchResponse = serde_json::from_value(json!({})).expect("empty body");
        assert_eq!(empty.hits.total_count(), 0);
    }

    #[test]
    fn test_esql_response_parses() {
        let body = json!({
            "columns": [{"name": "host", "type": "keyword"}, {"name": "count", "type": "long"}],
            "values": [["web-1", 3], ["web-2", null]]
        });
        let response: EsqlResponse = serde_json::from_value(body).expect("valid response");
        assert_eq!(response.columns[1].name, "count");
        assert_eq!(response.columns[1].data_type.as_deref(), Some("long"));
        assert_eq!(response.values[1][1], Value::Null);
    }

    #[test]
    fn test_from_delimited_csv_with_quotes() {
        let body = "host,message\nweb-1,\"hello, world\"\nweb-2,\"say \"\"hi\"\"\"\n";
        let response = EsqlResponse::from_delimited(body, ',');
        assert_eq!(response.columns.len(), 2);
        assert_eq!(response.values.len(), 2);
        assert_eq!(response.values[0][1], json!("hello, world"));
        assert_eq!(response.values[1][1], json!("say \"hi\""));
    }

    #[test]
    fn test_from_delimited_keeps_line_breaks_inside_quotes() {
        let body = "host,message\nweb-1,\"line one\nline two\"\nweb-2,ok\n";
        let response = EsqlResponse::from_delimited(body, ',');
        assert_eq!(response.values.len(), 2);
        assert_eq!(response.values[0], vec![json!("web-1"), json!("line one\nline two")]);
        assert_eq!(response.values[1], vec![json!("web-2"), json!("ok")]);
    }

    #[test]
    fn test_from_delimited_skips_blank_lines() {
        let response = EsqlResponse::from_delimited("a,b\n\n1,2\n\n", ',');
        assert_eq!(response.values, vec![vec![json!("1"), json!("2")]]);
    }

    #[test]
    fn test_from_delimited_tsv_and_empty() {
        let response = EsqlResponse::from_delimited("a\tb\r\n1\t2\r\n", '\t');
        assert_eq!(response.values, vec![vec![json!("1"), json!("2")]]);
        assert_eq!(EsqlResponse::from_delimited("", ','), EsqlResponse::default());
    }

    #[test]
    fn test_error_reason_shapes() {
        assert_eq!(
            error_reason(r#"{"error":{"type":"parsing_exception","reason":"line 1:6: mismatched input"}}"#)
                .as_deref(),
            Some("line 1:6: mismatched input")
        );
        assert_eq!(
            error_reason(r#"{"error":{"root_cause":[{"reason":"no such index [nope]"}]}}"#).as_deref(),
            Some("no such index [nope]")
        );
        assert_eq!(error_reason(r#"{"error":"plain text"}"#).as_deref(), Some("plain text"));
        assert_eq!(error_reason("<html>bad gateway</html>"), None);
    }
}
