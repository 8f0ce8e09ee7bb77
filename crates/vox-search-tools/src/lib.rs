//! Search collaborators for Vox.
//!
//! `SearchService` is the narrow contract the agent consumes: web search,
//! Wikipedia lookup, and news headlines, each returning an `ActionResult`.
//! `WebSearcher` implements it over HTTP with ordered provider fallbacks
//! (DuckDuckGo instant answers, then Wikipedia); `MockSearch` scripts
//! results for tests.

pub mod config;
pub mod error;
pub mod mock;
pub mod providers;
pub mod service;
pub mod text;

pub use config::SearchConfig;
pub use error::{SearchError, SearchResult};
pub use mock::{MockSearch, SearchCall};
pub use service::{SearchService, WebSearcher};
