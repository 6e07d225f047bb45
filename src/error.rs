// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("empty search query supplied")]
    EmptyQuery,

    #[error("invalid paragraph id list: {0}")]
    InvalidIdList(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search engine returned {status}: {message}")]
    Engine { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode engine response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Errors caused by the user's input rather than by the engine or the deployment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SearchError::EmptyQuery
                | SearchError::InvalidIdList(_)
                | SearchError::InvalidArgument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_message() {
        assert_eq!(
            SearchError::EmptyQuery.to_string(),
            "empty search query supplied"
        );
    }

    #[test]
    fn test_user_error_classification() {
        assert!(SearchError::EmptyQuery.is_user_error());
        assert!(SearchError::InvalidIdList("x".to_string()).is_user_error());
        assert!(!SearchError::NotFound("paragraph 1".to_string()).is_user_error());
        assert!(
            !SearchError::Engine {
                status: 500,
                message: "boom".to_string()
            }
            .is_user_error()
        );
    }
}
