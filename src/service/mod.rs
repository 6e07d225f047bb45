// file: src/service/mod.rs
// description: search operations exposed to the web and command line layers
// reference: internal module structure

pub mod search;

pub use search::{SearchOutcome, SearchService};
