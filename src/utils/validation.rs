// file: src/utils/validation.rs
// description: request parameter validation utilities and helpers
// reference: input validation patterns

use crate::error::{Result, SearchError};
use uuid::Uuid;

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SearchError::InvalidArgument(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Pages are 1-based.
    pub fn validate_page(page: usize) -> Result<()> {
        if page == 0 {
            return Err(SearchError::InvalidArgument(
                "page numbers start at 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_source_uuid(source_uuid: &str) -> Result<Uuid> {
        let trimmed = source_uuid.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidArgument(
                "source identifier is required".to_string(),
            ));
        }

        Uuid::parse_str(trimmed).map_err(|e| {
            SearchError::InvalidArgument(format!(
                "malformed source identifier {}: {}",
                trimmed, e
            ))
        })
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        }
    }
}
