// file: src/results/mod.rs
// description: shaping engine responses into view data
// reference: internal module structure

pub mod adapter;
pub mod highlight;

pub use adapter::ResultAdapter;
pub use highlight::{HighlightKind, highlight_field_content};
