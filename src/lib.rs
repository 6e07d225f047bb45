// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod manticore;
pub mod models;
pub mod parser;
pub mod query;
pub mod results;
pub mod service;
pub mod utils;
pub mod web;

pub use config::{Config, ManticoreConfig, SearchConfig, ServerConfig};
pub use error::{Result, SearchError};
pub use manticore::{ManticoreClient, SearchRequest, SearchResponse};
pub use models::{FacetBucket, Facets, FilterField, PagedResult, Paragraph, ParagraphField};
pub use parser::{MarkdownRenderer, QueryNormalizer};
pub use query::{MatchClause, MatchMode, QueryBuilder, SearchCriteria, parse_id_list};
pub use results::{HighlightKind, ResultAdapter, highlight_field_content};
pub use service::{SearchOutcome, SearchService};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};
pub use web::DisplaySettings;
