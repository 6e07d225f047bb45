// file: src/query/mod.rs
// description: search criteria and engine request construction
// reference: internal module structure

pub mod builder;
pub mod criteria;

pub use builder::{FUZZY_NOTICE, MatchClause, QueryBuilder, parse_id_list};
pub use criteria::{MatchMode, SearchCriteria};
