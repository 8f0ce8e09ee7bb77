//! HTTP providers. Each returns raw findings; `WebSearcher` turns them into
//! spoken `ActionResult`s.

pub mod duckduckgo;
pub mod news;
pub mod wikipedia;

use crate::error::{SearchError, SearchResult};

/// Fail on any non-2xx status.
pub(crate) fn check_status(response: reqwest::Response) -> SearchResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SearchError::Status {
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }
}
