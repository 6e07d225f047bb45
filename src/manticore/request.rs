// file: src/manticore/request.rs
// description: typed request bodies for the Manticore JSON search endpoint
// reference: https://manual.manticoresearch.com/Searching/Full_text_matching/Basic_usage#HTTP-JSON

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Empty {}

/// One node of the `query` tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryNode {
    MatchAll(Empty),
    QueryString(String),
    Match(BTreeMap<String, String>),
    MatchPhrase(BTreeMap<String, String>),
    In(BTreeMap<String, Vec<Value>>),
    Equals(BTreeMap<String, Value>),
    Bool(BoolQuery),
}

impl QueryNode {
    pub fn match_all() -> Self {
        QueryNode::MatchAll(Empty {})
    }

    pub fn keyword(field: &str, text: &str) -> Self {
        QueryNode::Match(single(field, text.to_string()))
    }

    pub fn phrase(field: &str, text: &str) -> Self {
        QueryNode::MatchPhrase(single(field, text.to_string()))
    }

    pub fn one_of<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        QueryNode::In(single(field, values.into_iter().map(Into::into).collect()))
    }

    pub fn equals(field: &str, value: impl Into<Value>) -> Self {
        QueryNode::Equals(single(field, value.into()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<QueryNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub fields: Vec<String>,
    pub limit: u32,
    pub no_match_size: u32,
    pub pre_tags: String,
    pub post_tags: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermsAggregation {
    pub field: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub terms: TermsAggregation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layouts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_matches: Option<usize>,
}

impl SearchOptions {
    pub fn is_empty(&self) -> bool {
        self.fuzzy.is_none() && self.layouts.is_none() && self.max_matches.is_none()
    }
}

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub table: String,
    pub query: QueryNode,
    pub limit: usize,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aggs: BTreeMap<String, Aggregation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<BTreeMap<String, SortOrder>>,
    #[serde(skip_serializing_if = "SearchOptions::is_empty")]
    pub options: SearchOptions,
}

impl SearchRequest {
    pub fn new(table: &str, query: QueryNode) -> Self {
        Self {
            table: table.to_string(),
            query,
            limit: 20,
            offset: 0,
            highlight: None,
            aggs: BTreeMap::new(),
            sort: Vec::new(),
            options: SearchOptions::default(),
        }
    }
}

fn single<V>(key: &str, value: V) -> BTreeMap<String, V> {
    let mut map = BTreeMap::new();
    map.insert(key.to_string(), value);
    map
}
