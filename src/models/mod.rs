// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod facet;
mod lenient;
pub mod paragraph;
pub mod search_result;

pub(crate) use lenient::u64_from_any;

pub use facet::{FacetBucket, Facets, FilterField};
pub use paragraph::{Paragraph, ParagraphDocument, ParagraphField};
pub use search_result::PagedResult;
