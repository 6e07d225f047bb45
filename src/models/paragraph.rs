// file: src/models/paragraph.rs
// description: Paragraph model decoded from engine hits
// reference: Manticore `_source` documents of the paragraph table

use super::lenient::{i64_from_any, opt_u64_from_any, string_from_any, u64_from_any};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields a highlight can be requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphField {
    Genre,
    Author,
    Title,
    Content,
}

impl ParagraphField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParagraphField::Genre => "genre",
            ParagraphField::Author => "author",
            ParagraphField::Title => "title",
            ParagraphField::Content => "content",
        }
    }
}

/// Stored attributes of one paragraph.
///
/// Two document layouts exist in the index history: `content`/`chunk`/`char_count`
/// and `text`/`position`/`length`. Both decode into the same fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphDocument {
    #[serde(default, deserialize_with = "string_from_any")]
    pub genre: String,
    #[serde(default, deserialize_with = "string_from_any")]
    pub genre_attr: String,
    #[serde(default, deserialize_with = "string_from_any")]
    pub author: String,
    #[serde(default, deserialize_with = "string_from_any")]
    pub author_attr: String,
    #[serde(default, deserialize_with = "string_from_any")]
    pub title: String,
    #[serde(default, deserialize_with = "string_from_any")]
    pub title_attr: String,

    #[serde(default, alias = "text", deserialize_with = "string_from_any")]
    pub content: String,
    /// Position of the paragraph inside its source.
    #[serde(default, alias = "position", deserialize_with = "u64_from_any")]
    pub chunk: u64,
    #[serde(default, alias = "length", deserialize_with = "u64_from_any")]
    pub char_count: u64,
    #[serde(default, deserialize_with = "u64_from_any")]
    pub word_count: u64,

    #[serde(default, deserialize_with = "string_from_any")]
    pub language: String,
    #[serde(default, deserialize_with = "string_from_any")]
    pub ocr_quality: String,

    #[serde(default, deserialize_with = "string_from_any")]
    pub source_uuid: String,
    /// Bibliographic citation of the source.
    #[serde(default, deserialize_with = "string_from_any")]
    pub source: String,
    #[serde(default, deserialize_with = "opt_u64_from_any")]
    pub book_id: Option<u64>,

    #[serde(default, deserialize_with = "i64_from_any")]
    pub datetime: i64,
    #[serde(default, deserialize_with = "i64_from_any")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "i64_from_any")]
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub id: u64,
    pub score: f64,
    #[serde(flatten)]
    pub document: ParagraphDocument,
    /// Engine fragments keyed by field name.
    pub highlight: BTreeMap<String, Vec<String>>,
}

impl Paragraph {
    pub fn new(
        id: u64,
        score: f64,
        document: ParagraphDocument,
        highlight: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            id,
            score,
            document,
            highlight,
        }
    }

    pub fn field(&self, field: ParagraphField) -> &str {
        match field {
            ParagraphField::Genre => &self.document.genre,
            ParagraphField::Author => &self.document.author,
            ParagraphField::Title => &self.document.title,
            ParagraphField::Content => &self.document.content,
        }
    }

    /// First non-empty highlight fragment for the field, if any.
    pub fn fragment(&self, field: ParagraphField) -> Option<&str> {
        self.highlight
            .get(field.as_str())
            .and_then(|fragments| fragments.first())
            .map(String::as_str)
            .filter(|fragment| !fragment.is_empty())
    }

    /// Highlighted fragment when present, raw field content otherwise.
    pub fn highlighted(&self, field: ParagraphField) -> &str {
        self.fragment(field).unwrap_or_else(|| self.field(field))
    }

    /// Page of the source listing that contains this paragraph.
    pub fn context_page(&self, page_size: usize) -> u64 {
        let page_size = page_size.max(1) as u64;
        self.document.chunk.div_ceil(page_size).max(1)
    }

    pub fn datetime_utc(&self) -> Option<DateTime<Utc>> {
        if self.document.datetime == 0 {
            return None;
        }
        DateTime::from_timestamp(self.document.datetime, 0)
    }
}
