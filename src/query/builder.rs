// file: src/query/builder.rs
// description: one request builder parameterized by the match clause variant
// reference: https://manual.manticoresearch.com/Searching/Full_text_matching/Basic_usage#HTTP-JSON

use super::criteria::{MatchMode, SearchCriteria};
use crate::config::{Config, SearchConfig};
use crate::error::{Result, SearchError};
use crate::manticore::request::{
    Aggregation, BoolQuery, Highlight, QueryNode, SearchRequest, SortOrder, TermsAggregation,
};
use crate::models::FilterField;
use crate::parser::QueryNormalizer;
use crate::parser::markdown::{MARK_CLOSE, MARK_OPEN};
use crate::utils::Validator;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Result window the engine serves without an explicit `max_matches`.
pub const DEFAULT_MAX_MATCHES: usize = 1000;

pub const FUZZY_NOTICE: &str =
    "Fuzzy search is enabled. Uncheck it in the search settings to turn it off.";

const ALL_FIELDS: &str = "*";

#[derive(Debug, Clone, PartialEq)]
pub enum MatchClause {
    /// Full-text query syntax; blank text means filters only.
    QueryString(String),
    Keyword(String),
    Phrase(String),
    IdList(Vec<u64>),
    Equals { field: String, value: Value },
}

impl MatchClause {
    /// Picks the clause for the form's match mode, rejecting empty input where text is required.
    pub fn from_criteria(criteria: &SearchCriteria) -> Result<Self> {
        match criteria.matching {
            MatchMode::QueryString => Ok(MatchClause::QueryString(
                QueryNormalizer::prepare_query_string(&criteria.query),
            )),
            MatchMode::Match => Ok(MatchClause::Keyword(required_text(criteria)?)),
            MatchMode::MatchPhrase => Ok(MatchClause::Phrase(required_text(criteria)?)),
            MatchMode::Id => Ok(MatchClause::IdList(parse_id_list(&required_text(
                criteria,
            )?)?)),
            MatchMode::Source => {
                let raw = if criteria.source_uuid.trim().is_empty() {
                    &criteria.query
                } else {
                    &criteria.source_uuid
                };
                let source_uuid = Validator::validate_source_uuid(raw)?;
                Ok(MatchClause::Equals {
                    field: "source_uuid".to_string(),
                    value: Value::String(source_uuid.to_string()),
                })
            }
        }
    }

    fn node(&self) -> Option<QueryNode> {
        match self {
            MatchClause::QueryString(text) if text.trim().is_empty() => None,
            MatchClause::QueryString(text) => Some(QueryNode::QueryString(text.clone())),
            MatchClause::Keyword(text) => Some(QueryNode::keyword(ALL_FIELDS, text)),
            MatchClause::Phrase(text) => Some(QueryNode::phrase(ALL_FIELDS, text)),
            MatchClause::IdList(ids) => Some(QueryNode::one_of("id", ids.iter().copied())),
            MatchClause::Equals { field, value } => {
                Some(QueryNode::equals(field, value.clone()))
            }
        }
    }

    fn highlight_fields(&self) -> &'static [&'static str] {
        match self {
            MatchClause::QueryString(_) => &["title", "content"],
            MatchClause::IdList(_) => &["content"],
            MatchClause::Keyword(_) | MatchClause::Phrase(_) | MatchClause::Equals { .. } => {
                &["genre", "author", "title", "content"]
            }
        }
    }

    fn sort(&self) -> Option<(&'static str, SortOrder)> {
        match self {
            MatchClause::IdList(_) | MatchClause::Equals { .. } => Some(("id", SortOrder::Asc)),
            _ => None,
        }
    }
}

/// Splits `"12,0,abc,7"` into `[12, 7]`: zero, non-numeric and repeated ids are dropped.
pub fn parse_id_list(text: &str) -> Result<Vec<u64>> {
    let mut ids = Vec::new();
    for token in text.split(',') {
        match token.trim().parse::<u64>() {
            Ok(id) if id != 0 && !ids.contains(&id) => ids.push(id),
            _ => {}
        }
    }

    if ids.is_empty() {
        return Err(SearchError::InvalidIdList(format!(
            "\"{}\" holds no paragraph number; give one number or several separated by commas",
            text
        )));
    }

    Ok(ids)
}

fn required_text(criteria: &SearchCriteria) -> Result<String> {
    let text = criteria.query.trim();
    if text.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    Ok(text.to_string())
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    settings: SearchConfig,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>, settings: SearchConfig) -> Self {
        Self {
            table: table.into(),
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.manticore.table.clone(), config.search.clone())
    }

    pub fn page_size(&self) -> usize {
        self.settings.page_size
    }

    /// Request for the criteria's own match mode.
    pub fn build_for(&self, criteria: &SearchCriteria, page: usize) -> Result<SearchRequest> {
        let clause = MatchClause::from_criteria(criteria)?;
        self.build(&clause, criteria, page)
    }

    /// Match clause plus filters, facets, highlighting, fuzzy options and pagination.
    pub fn build(
        &self,
        clause: &MatchClause,
        criteria: &SearchCriteria,
        page: usize,
    ) -> Result<SearchRequest> {
        let mut must: Vec<QueryNode> = clause.node().into_iter().collect();
        for (field, value) in criteria.active_filters() {
            must.push(QueryNode::one_of(field.attr_name(), [value]));
        }

        let query = if must.is_empty() {
            QueryNode::match_all()
        } else {
            QueryNode::Bool(BoolQuery { must })
        };

        let mut request = SearchRequest::new(&self.table, query);
        self.paginate(&mut request, page, self.settings.page_size)?;

        request.highlight = Some(Highlight {
            fields: clause
                .highlight_fields()
                .iter()
                .map(|f| f.to_string())
                .collect(),
            limit: 0,
            no_match_size: 0,
            pre_tags: MARK_OPEN.to_string(),
            post_tags: MARK_CLOSE.to_string(),
        });
        request.aggs = self.facet_aggregations();

        if let Some((field, order)) = clause.sort() {
            let mut sort = BTreeMap::new();
            sort.insert(field.to_string(), order);
            request.sort.push(sort);
        }

        if criteria.fuzzy {
            request.options.fuzzy = Some(true);
            request.options.layouts = Some(self.settings.fuzzy_layouts.clone());
        }

        debug!(
            "Built {:?} request: {} filters, page {}, fuzzy {}",
            criteria.matching,
            criteria.active_filters().len(),
            page,
            criteria.fuzzy
        );

        Ok(request)
    }

    /// Aggregations over the whole table, no hits.
    pub fn facets_only(&self) -> SearchRequest {
        let mut request = SearchRequest::new(&self.table, QueryNode::match_all());
        request.limit = 0;
        request.aggs = self.facet_aggregations();
        request
    }

    /// Plain lookup without facets or highlighting, ordered by id.
    pub fn lookup(&self, clause: &MatchClause, page: usize, page_size: usize) -> Result<SearchRequest> {
        let query = clause.node().unwrap_or_else(QueryNode::match_all);
        let mut request = SearchRequest::new(&self.table, query);
        self.paginate(&mut request, page, page_size)?;

        let mut sort = BTreeMap::new();
        sort.insert("id".to_string(), SortOrder::Asc);
        request.sort.push(sort);
        Ok(request)
    }

    fn paginate(&self, request: &mut SearchRequest, page: usize, page_size: usize) -> Result<()> {
        Validator::validate_page(page)?;
        let past_window = || {
            SearchError::InvalidArgument(format!(
                "results past position {} are not available",
                self.settings.max_matches
            ))
        };

        let offset = (page - 1).checked_mul(page_size).ok_or_else(past_window)?;
        let window = offset.checked_add(page_size).ok_or_else(past_window)?;
        if window > self.settings.max_matches.max(DEFAULT_MAX_MATCHES) {
            return Err(past_window());
        }

        request.limit = page_size;
        request.offset = offset;
        if window > DEFAULT_MAX_MATCHES {
            request.options.max_matches = Some(window);
        }
        Ok(())
    }

    fn facet_aggregations(&self) -> BTreeMap<String, Aggregation> {
        FilterField::ALL
            .iter()
            .map(|field| {
                (
                    field.group_name().to_string(),
                    Aggregation {
                        terms: TermsAggregation {
                            field: field.attr_name().to_string(),
                            size: self.settings.facet_size,
                        },
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn builder() -> QueryBuilder {
        QueryBuilder::from_config(&Config::default_config())
    }

    fn body(request: &SearchRequest) -> Value {
        serde_json::to_value(request).unwrap()
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("12,0,abc,7").unwrap(), vec![12, 7]);
        assert_eq!(parse_id_list(" 5 , 5, 9").unwrap(), vec![5, 9]);
        assert!(matches!(
            parse_id_list("0,abc,-3"),
            Err(SearchError::InvalidIdList(_))
        ));
    }

    #[test]
    fn test_query_string_full_request() {
        let criteria = SearchCriteria::new("война (мир")
            .with_filter(FilterField::Genre, "Проза")
            .with_fuzzy(true);
        let request = builder().build_for(&criteria, 2).unwrap();

        assert_eq!(
            body(&request),
            json!({
                "table": "library2025",
                "query": { "bool": { "must": [
                    { "query_string": "война \\(мир" },
                    { "in": { "genre_attr": ["Проза"] } }
                ] } },
                "limit": 20,
                "offset": 20,
                "highlight": {
                    "fields": ["title", "content"],
                    "limit": 0,
                    "no_match_size": 0,
                    "pre_tags": "<mark>",
                    "post_tags": "</mark>"
                },
                "aggs": {
                    "author_group": { "terms": { "field": "author_attr", "size": 100 } },
                    "genre_group": { "terms": { "field": "genre_attr", "size": 100 } },
                    "title_group": { "terms": { "field": "title_attr", "size": 100 } }
                },
                "options": { "fuzzy": true, "layouts": ["ru", "us"] }
            })
        );
    }

    #[test]
    fn test_blank_text_with_filter_is_filter_only() {
        let criteria = SearchCriteria::new("   ").with_filter(FilterField::Genre, "Поэзия");
        let request = builder().build_for(&criteria, 1).unwrap();

        assert_eq!(
            body(&request)["query"],
            json!({ "bool": { "must": [ { "in": { "genre_attr": ["Поэзия"] } } ] } })
        );
    }

    #[test]
    fn test_blank_text_without_filters_matches_all() {
        let request = builder().build_for(&SearchCriteria::default(), 1).unwrap();
        assert_eq!(body(&request)["query"], json!({ "match_all": {} }));
    }

    #[test]
    fn test_text_required_shapes_reject_blank_text() {
        for mode in [MatchMode::Match, MatchMode::MatchPhrase, MatchMode::Id] {
            let criteria = SearchCriteria::new("")
                .with_filter(FilterField::Genre, "Поэзия")
                .with_matching(mode);
            assert!(
                matches!(builder().build_for(&criteria, 1), Err(SearchError::EmptyQuery)),
                "mode {:?}",
                mode
            );
        }
    }

    #[test]
    fn test_keyword_and_phrase_clauses() {
        let keyword = builder()
            .build_for(&SearchCriteria::new("белая гвардия").with_matching(MatchMode::Match), 1)
            .unwrap();
        assert_eq!(
            body(&keyword)["query"]["bool"]["must"][0],
            json!({ "match": { "*": "белая гвардия" } })
        );
        assert_eq!(
            body(&keyword)["highlight"]["fields"],
            json!(["genre", "author", "title", "content"])
        );

        let phrase = builder()
            .build_for(
                &SearchCriteria::new("белая гвардия").with_matching(MatchMode::MatchPhrase),
                1,
            )
            .unwrap();
        assert_eq!(
            body(&phrase)["query"]["bool"]["must"][0],
            json!({ "match_phrase": { "*": "белая гвардия" } })
        );
    }

    #[test]
    fn test_id_list_clause_sorted_by_id() {
        let request = builder()
            .build_for(&SearchCriteria::new("12,0,abc,7").with_matching(MatchMode::Id), 1)
            .unwrap();
        let value = body(&request);

        assert_eq!(value["query"]["bool"]["must"][0], json!({ "in": { "id": [12, 7] } }));
        assert_eq!(value["highlight"]["fields"], json!(["content"]));
        assert_eq!(value["sort"], json!([{ "id": "asc" }]));
    }

    #[test]
    fn test_source_clause() {
        let mut criteria = SearchCriteria::default().with_matching(MatchMode::Source);
        criteria.source_uuid = "0f8fad5b-d9cb-469f-a165-70867728950e".to_string();
        let request = builder().build_for(&criteria, 1).unwrap();

        assert_eq!(
            body(&request)["query"]["bool"]["must"][0],
            json!({ "equals": { "source_uuid": "0f8fad5b-d9cb-469f-a165-70867728950e" } })
        );

        let missing = SearchCriteria::default().with_matching(MatchMode::Source);
        assert!(matches!(
            builder().build_for(&missing, 1),
            Err(SearchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_deep_pages_raise_max_matches() {
        let criteria = SearchCriteria::new("мир");
        let request = builder().build_for(&criteria, 60).unwrap();

        assert_eq!(request.offset, 1180);
        assert_eq!(request.options.max_matches, Some(1200));

        assert!(builder().build_for(&criteria, 50).unwrap().options.max_matches.is_none());
        assert!(matches!(
            builder().build_for(&criteria, 600),
            Err(SearchError::InvalidArgument(_))
        ));
        assert!(builder().build_for(&criteria, 0).is_err());
    }

    #[test]
    fn test_huge_pages_are_rejected_without_overflow() {
        let criteria = SearchCriteria::new("мир");
        for page in [(1usize << 62) + 1, usize::MAX / 2, usize::MAX] {
            assert!(
                matches!(
                    builder().build_for(&criteria, page),
                    Err(SearchError::InvalidArgument(_))
                ),
                "page {}",
                page
            );
        }

        let clause = MatchClause::Equals {
            field: "book_id".to_string(),
            value: json!(17),
        };
        assert!(matches!(
            builder().lookup(&clause, usize::MAX, 20),
            Err(SearchError::InvalidArgument(_))
        ));
        assert!(matches!(
            builder().lookup(&clause, 2, usize::MAX),
            Err(SearchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_facets_only() {
        let value = body(&builder().facets_only());

        assert_eq!(value["limit"], json!(0));
        assert_eq!(value["query"], json!({ "match_all": {} }));
        assert_eq!(value["aggs"]["title_group"]["terms"]["field"], json!("title_attr"));
        assert!(value.get("highlight").is_none());
    }

    #[test]
    fn test_lookup_has_no_facets() {
        let clause = MatchClause::Equals {
            field: "book_id".to_string(),
            value: json!(17),
        };
        let value = body(&builder().lookup(&clause, 2, 50).unwrap());

        assert_eq!(value["query"], json!({ "equals": { "book_id": 17 } }));
        assert_eq!(value["offset"], json!(50));
        assert!(value.get("aggs").is_none());
        assert_eq!(value["sort"], json!([{ "id": "asc" }]));
    }
}
