// file: src/manticore/response.rs
// description: typed response bodies of the Manticore JSON search endpoint
// reference: https://manual.manticoresearch.com/Searching/Full_text_matching/Basic_usage#HTTP-JSON

use crate::models::{ParagraphDocument, u64_from_any};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    pub hits: HitsEnvelope,
    #[serde(default)]
    pub aggregations: BTreeMap<String, AggregationResult>,
    #[serde(default)]
    pub warning: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default, deserialize_with = "u64_from_any")]
    pub total: u64,
    #[serde(default)]
    pub total_relation: Option<String>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id", deserialize_with = "u64_from_any")]
    pub id: u64,
    #[serde(rename = "_score", default)]
    pub score: f64,
    #[serde(rename = "_source", default)]
    pub source: ParagraphDocument,
    #[serde(default)]
    pub highlight: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregationResult {
    #[serde(default)]
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bucket {
    #[serde(deserialize_with = "bucket_key")]
    pub key: String,
    #[serde(default, deserialize_with = "u64_from_any")]
    pub doc_count: u64,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: serde_json::Value,
}

impl ErrorResponse {
    pub fn message(&self) -> String {
        match &self.error {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(map) => map
                .get("reason")
                .or_else(|| map.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| self.error.to_string()),
            other => other.to_string(),
        }
    }
}

fn bucket_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
