// file: src/service/search.rs
// description: request-scoped search operations over the engine client
// reference: search, context and lookup pages of the front end

use crate::config::{Config, SearchConfig};
use crate::error::{Result, SearchError};
use crate::manticore::{ManticoreClient, SearchRequest, SearchResponse};
use crate::models::{Facets, PagedResult, Paragraph};
use crate::query::builder::DEFAULT_MAX_MATCHES;
use crate::query::{FUZZY_NOTICE, MatchClause, MatchMode, QueryBuilder, SearchCriteria};
use crate::results::ResultAdapter;
use crate::utils::{HealthCheck, HealthReport, OperationTimer};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub results: PagedResult<Paragraph>,
    pub facets: Facets,
    pub notice: Option<String>,
}

#[derive(Clone)]
pub struct SearchService {
    client: ManticoreClient,
    builder: QueryBuilder,
    settings: SearchConfig,
}

impl SearchService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ManticoreClient::new(&config.manticore)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: ManticoreClient, config: &Config) -> Self {
        Self {
            client,
            builder: QueryBuilder::from_config(config),
            settings: config.search.clone(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.settings.page_size
    }

    pub async fn search(&self, criteria: &SearchCriteria, page: usize) -> Result<SearchOutcome> {
        let criteria = criteria.clone().normalized();
        let request = self.builder.build_for(&criteria, page)?;

        let response = self.execute("search", &request).await?;
        let facets = ResultAdapter::facets(&response, &criteria);
        let results = ResultAdapter::paged(response, page, self.settings.page_size);

        info!(
            "Search [{}] \"{}\" matched {} paragraphs",
            criteria.matching, criteria.query, results.total_count
        );

        Ok(SearchOutcome {
            results,
            facets,
            notice: criteria.fuzzy.then(|| FUZZY_NOTICE.to_string()),
        })
    }

    /// Facet counts over the whole table.
    pub async fn all_facets(&self) -> Result<Facets> {
        let request = self.builder.facets_only();
        let response = self.execute("facets", &request).await?;
        Ok(ResultAdapter::facets(&response, &SearchCriteria::default()))
    }

    /// Paragraphs of one source in reading order.
    pub async fn context(&self, source_uuid: &str, page: usize) -> Result<PagedResult<Paragraph>> {
        let mut criteria = SearchCriteria::default().with_matching(MatchMode::Source);
        criteria.source_uuid = source_uuid.trim().to_string();

        let request = self.builder.build_for(&criteria, page)?;
        let response = self.execute("context", &request).await?;
        Ok(ResultAdapter::paged(response, page, self.settings.page_size))
    }

    /// Every listed paragraph on a single page.
    pub async fn by_ids(&self, text: &str) -> Result<PagedResult<Paragraph>> {
        let criteria = SearchCriteria::new(text).with_matching(MatchMode::Id).normalized();
        let clause = MatchClause::from_criteria(&criteria)?;
        let wanted = match &clause {
            MatchClause::IdList(ids) => ids.len(),
            _ => 0,
        };
        if wanted > self.settings.max_matches {
            return Err(SearchError::InvalidArgument(format!(
                "at most {} ids can be listed at once",
                self.settings.max_matches
            )));
        }

        let mut request = self.builder.build(&clause, &criteria, 1)?;
        request.limit = request.limit.max(wanted);
        if request.limit > DEFAULT_MAX_MATCHES {
            request.options.max_matches = Some(request.limit);
        }

        let response = self.execute("by_ids", &request).await?;
        let page_size = request.limit;
        Ok(ResultAdapter::paged(response, 1, page_size))
    }

    pub async fn paragraph(&self, id: u64) -> Result<Paragraph> {
        if id == 0 {
            return Err(SearchError::InvalidArgument(
                "paragraph id must be a positive number".to_string(),
            ));
        }

        let request = self.builder.lookup(&MatchClause::IdList(vec![id]), 1, 1)?;
        self.first("paragraph", &request)
            .await?
            .ok_or_else(|| SearchError::NotFound(format!("paragraph {}", id)))
    }

    /// Opening paragraph of a book.
    pub async fn book(&self, book_id: u64) -> Result<Paragraph> {
        let request = self.builder.lookup(&book_clause(book_id), 1, 1)?;
        self.first("book", &request)
            .await?
            .ok_or_else(|| SearchError::NotFound(format!("book {}", book_id)))
    }

    pub async fn book_paragraphs(&self, book_id: u64, page: usize) -> Result<PagedResult<Paragraph>> {
        let request = self
            .builder
            .lookup(&book_clause(book_id), page, self.settings.page_size)?;
        let response = self.execute("book_paragraphs", &request).await?;
        Ok(ResultAdapter::paged(response, page, self.settings.page_size))
    }

    pub async fn health(&self) -> HealthReport {
        let timer = OperationTimer::new("health probe", self.slow_after());
        let outcome = self.client.ping().await;
        if let Err(e) = &outcome {
            warn!("Manticore health probe failed: {}", e);
        }

        let check = HealthCheck::from_outcome("manticore", &outcome, timer.elapsed(), self.slow_after());
        timer.finish();
        HealthReport::new(vec![check])
    }

    async fn first(&self, operation: &str, request: &SearchRequest) -> Result<Option<Paragraph>> {
        let response = self.execute(operation, request).await?;
        Ok(response
            .hits
            .hits
            .into_iter()
            .next()
            .map(ResultAdapter::paragraph))
    }

    async fn execute(&self, operation: &str, request: &SearchRequest) -> Result<SearchResponse> {
        let timer = OperationTimer::new(
            format!("{} query on {}", operation, self.client.table()),
            self.slow_after(),
        );
        let response = self.client.search(request).await;
        timer.finish();
        response
    }

    fn slow_after(&self) -> Duration {
        Duration::from_millis(self.settings.slow_query_ms)
    }
}

fn book_clause(book_id: u64) -> MatchClause {
    MatchClause::Equals {
        field: "book_id".to_string(),
        value: Value::from(book_id),
    }
}
