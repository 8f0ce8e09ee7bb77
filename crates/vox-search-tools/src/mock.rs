//! Mock search service for testing.
//!
//! Records every call and answers from scripted results. Unscripted calls
//! succeed with a canned summary that echoes the input.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use vox_protocol::ActionResult;

use crate::service::SearchService;

/// Which `SearchService` method was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchCall {
    Web,
    Wikipedia,
    News,
}

/// Mock search service with scripted responses and call recording.
pub struct MockSearch {
    responses: Mutex<HashMap<(SearchCall, String), ActionResult>>,
    calls: Mutex<Vec<(SearchCall, String)>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the result for one (method, argument) pair.
    pub fn respond(&self, call: SearchCall, arg: &str, result: ActionResult) {
        self.responses
            .lock()
            .unwrap()
            .insert((call, arg.to_string()), result);
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<(SearchCall, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<(SearchCall, String)> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn answer(&self, call: SearchCall, arg: &str) -> ActionResult {
        self.calls.lock().unwrap().push((call, arg.to_string()));
        self.responses
            .lock()
            .unwrap()
            .get(&(call, arg.to_string()))
            .cloned()
            .unwrap_or_else(|| {
                let summary = match call {
                    SearchCall::Web => format!("Results for {arg}."),
                    SearchCall::Wikipedia => format!("Wikipedia says {arg}."),
                    SearchCall::News => format!("Here are the latest {arg} headlines: A. B. C"),
                };
                ActionResult::success(summary)
            })
    }
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchService for MockSearch {
    async fn search_web(&self, query: &str) -> ActionResult {
        self.answer(SearchCall::Web, query)
    }

    async fn search_wikipedia(&self, query: &str) -> ActionResult {
        self.answer(SearchCall::Wikipedia, query)
    }

    async fn get_news_headlines(&self, topic: &str) -> ActionResult {
        self.answer(SearchCall::News, topic)
    }
}
