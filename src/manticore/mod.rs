// file: src/manticore/mod.rs
// description: Manticore search engine client and wire types
// reference: https://manual.manticoresearch.com

pub mod client;
pub mod request;
pub mod response;

pub use client::ManticoreClient;
pub use request::{QueryNode, SearchRequest};
pub use response::{Hit, SearchResponse};
