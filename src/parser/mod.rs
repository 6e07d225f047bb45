// file: src/parser/mod.rs
// description: text processing module exports
// reference: internal module structure

pub mod markdown;
pub mod normalizer;

pub use markdown::MarkdownRenderer;
pub use normalizer::QueryNormalizer;
