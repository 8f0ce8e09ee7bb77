//! Search error types.

use thiserror::Error;

/// Errors from search providers and feed parsing.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("response decode error: {0}")]
    Decode(String),

    #[error("feed parse error: {0}")]
    Feed(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// Convenience alias for search results.
pub type SearchResult<T> = Result<T, SearchError>;
