// file: src/results/adapter.rs
// description: engine hits and aggregations to paragraphs, pages and facets
// reference: https://manual.manticoresearch.com/Searching/Faceted_search

use crate::manticore::SearchResponse;
use crate::manticore::response::Hit;
use crate::models::{FacetBucket, Facets, FilterField, PagedResult, Paragraph};
use crate::query::SearchCriteria;
use tracing::debug;

pub struct ResultAdapter;

impl ResultAdapter {
    pub fn paragraph(hit: Hit) -> Paragraph {
        Paragraph::new(hit.id, hit.score, hit.source, hit.highlight)
    }

    pub fn paragraphs(hits: Vec<Hit>) -> Vec<Paragraph> {
        hits.into_iter().map(Self::paragraph).collect()
    }

    /// Page of paragraphs; the total comes from `hits.total`, not from the page length.
    pub fn paged(response: SearchResponse, page: usize, page_size: usize) -> PagedResult<Paragraph> {
        let total = response.hits.total;
        let items = Self::paragraphs(response.hits.hits);
        debug!("Adapted {} paragraphs of {} (page {})", items.len(), total, page);
        PagedResult::new(items, page, page_size, total)
    }

    /// Buckets of the three facet groups; empty keys are dropped and the applied filter is flagged.
    pub fn facets(response: &SearchResponse, criteria: &SearchCriteria) -> Facets {
        let mut facets = Facets {
            total: response.hits.total,
            ..Default::default()
        };

        for field in FilterField::ALL {
            let Some(aggregation) = response.aggregations.get(field.group_name()) else {
                continue;
            };
            let applied = criteria.filter(field);

            let buckets = facets.buckets_mut(field);
            for bucket in &aggregation.buckets {
                let value = bucket.key.trim();
                if value.is_empty() {
                    continue;
                }
                buckets.push(FacetBucket {
                    value: value.to_string(),
                    count: bucket.doc_count,
                    active: applied == Some(value),
                });
            }
        }

        facets
    }
}
