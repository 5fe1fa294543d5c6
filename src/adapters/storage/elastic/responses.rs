//! Response bodies of the search backend endpoints we call

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    pub errors: bool,
    /// One entry per document, keyed by action name
    #[serde(default)]
    pub items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItem {
    #[serde(default)]
    pub error: Option<Value>,
}

impl BulkResponse {
    /// Reason of the first rejected item, if the backend reported one
    pub fn first_error(&self) -> Option<String> {
        self.items
            .iter()
            .flat_map(|item| item.values())
            .find_map(|item| item.error.as_ref())
            .map(|error| match error.get("reason").and_then(Value::as_str) {
                Some(reason) => reason.to_string(),
                None => error.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
    #[serde(default)]
    pub aggregations: HashMap<String, Aggregate>,
}

#[derive(Debug, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub total: Option<Total>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct Total {
    pub value: u64,
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(default)]
    pub sort: Vec<Value>,
}

/// Single-value metric aggregation; `value` is null over an empty index
#[derive(Debug, Deserialize)]
pub struct Aggregate {
    pub value: Option<f64>,
}

impl SearchResponse {
    pub fn total(&self) -> u64 {
        self.hits.total.as_ref().map_or(0, |total| total.value)
    }

    pub fn aggregate(&self, name: &str) -> Option<u32> {
        self.aggregations
            .get(name)
            .and_then(|agg| agg.value)
            .map(|value| value as u32)
    }

    /// First sort value of every hit, as ledger sequences
    pub fn sort_keys(&self) -> Vec<u32> {
        self.hits
            .hits
            .iter()
            .filter_map(|hit| hit.sort.first().and_then(Value::as_u64))
            .filter_map(|seq| u32::try_from(seq).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_item_error_reason() {
        let body: BulkResponse = serde_json::from_str(
            r#"{"took":3,"errors":true,"items":[
                {"index":{"_index":"ledgers","_id":"1","status":201}},
                {"index":{"_index":"ledgers","_id":"2","status":400,
                  "error":{"type":"mapper_parsing_exception","reason":"failed to parse"}}}
            ]}"#,
        )
        .unwrap();

        assert!(body.errors);
        assert_eq!(body.first_error().as_deref(), Some("failed to parse"));
    }

    #[test]
    fn stats_from_aggregations() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"hits":{"total":{"value":42,"relation":"eq"},"hits":[]},
                "aggregations":{"min_seq":{"value":100.0},"max_seq":{"value":141.0}}}"#,
        )
        .unwrap();

        assert_eq!(body.total(), 42);
        assert_eq!(body.aggregate("min_seq"), Some(100));
        assert_eq!(body.aggregate("max_seq"), Some(141));
    }

    #[test]
    fn empty_index_has_no_bounds() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"hits":{"total":{"value":0,"relation":"eq"},"hits":[]},
                "aggregations":{"min_seq":{"value":null},"max_seq":{"value":null}}}"#,
        )
        .unwrap();

        assert_eq!(body.aggregate("min_seq"), None);
    }

    #[test]
    fn sort_keys_in_hit_order() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"hits":{"hits":[{"sort":[7]},{"sort":[8]},{"sort":[10]}]}}"#,
        )
        .unwrap();

        assert_eq!(body.sort_keys(), vec![7, 8, 10]);
    }
}
