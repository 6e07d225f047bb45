// file: src/query/criteria.rs
// description: search form values and match mode selection
// reference: request parameters of the search page

use crate::models::FilterField;
use crate::parser::QueryNormalizer;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Which match clause the builder produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Full-text query syntax with operators
    #[default]
    QueryString,
    /// Any of the keywords
    Match,
    /// Exact phrase
    MatchPhrase,
    /// Comma-separated paragraph ids
    Id,
    /// All paragraphs of one source
    Source,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::QueryString => "query_string",
            MatchMode::Match => "match",
            MatchMode::MatchPhrase => "match_phrase",
            MatchMode::Id => "id",
            MatchMode::Source => "source",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "query_string" | "" => Ok(MatchMode::QueryString),
            "match" => Ok(MatchMode::Match),
            "match_phrase" | "phrase" => Ok(MatchMode::MatchPhrase),
            "id" | "ids" => Ok(MatchMode::Id),
            "source" => Ok(MatchMode::Source),
            other => Err(format!("unknown match mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub query: String,
    pub genre: String,
    pub author: String,
    pub title: String,
    #[serde(deserialize_with = "flag")]
    pub fuzzy: bool,
    #[serde(alias = "singleLineMode", deserialize_with = "flag")]
    pub single_line_mode: bool,
    pub matching: MatchMode,
    pub source_uuid: String,
}

impl SearchCriteria {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, field: FilterField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            FilterField::Genre => self.genre = value,
            FilterField::Author => self.author = value,
            FilterField::Title => self.title = value,
        }
        self
    }

    pub fn with_matching(mut self, matching: MatchMode) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    /// Whitespace and Unicode normalization of the search text; case is kept.
    /// Filter values are only trimmed since they must equal a stored attribute.
    pub fn normalized(self) -> Self {
        Self {
            query: QueryNormalizer::normalize_string(&self.query, false),
            genre: self.genre.trim().to_string(),
            author: self.author.trim().to_string(),
            title: self.title.trim().to_string(),
            source_uuid: self.source_uuid.trim().to_string(),
            ..self
        }
    }

    pub fn has_text(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn filter(&self, field: FilterField) -> Option<&str> {
        let value = match field {
            FilterField::Genre => &self.genre,
            FilterField::Author => &self.author,
            FilterField::Title => &self.title,
        };
        let value = value.trim();
        if value.is_empty() { None } else { Some(value) }
    }

    pub fn active_filters(&self) -> Vec<(FilterField, &str)> {
        FilterField::ALL
            .iter()
            .filter_map(|field| self.filter(*field).map(|value| (*field, value)))
            .collect()
    }
}

/// Checkbox-style boolean: `true`, `1`, `on`, `yes` and their negatives.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "" | "0" | "false" | "off" | "no" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean flag: {}", other))),
        },
        other => Err(D::Error::custom(format!("invalid boolean flag: {}", other))),
    }
}
