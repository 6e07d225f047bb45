// file: src/models/facet.rs
// description: facet buckets for the genre, author and title sidebars
// reference: Manticore terms aggregations

use serde::{Deserialize, Serialize};

/// Attributes the search form can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Genre,
    Author,
    Title,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [FilterField::Genre, FilterField::Author, FilterField::Title];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Genre => "genre",
            FilterField::Author => "author",
            FilterField::Title => "title",
        }
    }

    /// String attribute holding the exact filter value.
    pub fn attr_name(&self) -> &'static str {
        match self {
            FilterField::Genre => "genre_attr",
            FilterField::Author => "author_attr",
            FilterField::Title => "title_attr",
        }
    }

    /// Aggregation name used in requests and responses.
    pub fn group_name(&self) -> &'static str {
        match self {
            FilterField::Genre => "genre_group",
            FilterField::Author => "author_group",
            FilterField::Title => "title_group",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub value: String,
    pub count: u64,
    /// The bucket equals the filter currently applied.
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub total: u64,
    pub genre: Vec<FacetBucket>,
    pub author: Vec<FacetBucket>,
    pub title: Vec<FacetBucket>,
}

impl Facets {
    pub fn buckets(&self, field: FilterField) -> &[FacetBucket] {
        match field {
            FilterField::Genre => &self.genre,
            FilterField::Author => &self.author,
            FilterField::Title => &self.title,
        }
    }

    pub fn buckets_mut(&mut self, field: FilterField) -> &mut Vec<FacetBucket> {
        match field {
            FilterField::Genre => &mut self.genre,
            FilterField::Author => &mut self.author,
            FilterField::Title => &mut self.title,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL
            .iter()
            .all(|field| self.buckets(*field).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(FilterField::Author.attr_name(), "author_attr");
        assert_eq!(FilterField::Title.group_name(), "title_group");
        assert_eq!(FilterField::Genre.as_str(), "genre");
    }

    #[test]
    fn test_buckets_access() {
        let mut facets = Facets::default();
        assert!(facets.is_empty());

        facets.buckets_mut(FilterField::Author).push(FacetBucket {
            value: "Чехов А.П.".to_string(),
            count: 12,
            active: false,
        });

        assert!(!facets.is_empty());
        assert_eq!(facets.buckets(FilterField::Author).len(), 1);
        assert!(facets.buckets(FilterField::Genre).is_empty());
    }
}
