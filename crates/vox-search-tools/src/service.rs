//! `SearchService` trait and its HTTP implementation.

use async_trait::async_trait;
use std::time::Duration;

use vox_protocol::ActionResult;

use crate::config::{DEFAULT_TOPIC, SearchConfig};
use crate::error::SearchResult;
use crate::providers::wikipedia::{PageKind, PageSummary};
use crate::providers::{duckduckgo, news, wikipedia};
use crate::text::{first_sentences, truncate_text};

/// Sentences read out for a direct Wikipedia lookup.
const WIKIPEDIA_SENTENCES: usize = 3;
/// Sentences used when Wikipedia is only a web-search fallback.
const FALLBACK_SENTENCES: usize = 2;
/// Headlines fetched per feed; only the first few are spoken.
const FEED_ITEMS: usize = 5;

/// The search capabilities the agent depends on.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search_web(&self, query: &str) -> ActionResult;

    async fn search_wikipedia(&self, query: &str) -> ActionResult;

    async fn get_news_headlines(&self, topic: &str) -> ActionResult;
}

/// HTTP-backed search with ordered provider fallbacks.
pub struct WebSearcher {
    client: reqwest::Client,
    config: SearchConfig,
}

impl WebSearcher {
    pub fn new(config: SearchConfig) -> SearchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    async fn from_duckduckgo(&self, query: &str) -> SearchResult<Option<ActionResult>> {
        let answer = duckduckgo::instant_answer(
            &self.client,
            &self.config.duckduckgo_url,
            query,
            self.config.max_results,
        )
        .await?;

        Ok(answer.map(|a| {
            ActionResult::success(truncate_text(&a.text, self.config.summary_length)).with_data(
                serde_json::json!({
                    "query": query,
                    "provider": "duckduckgo",
                    "abstract": a.text,
                    "source": a.source,
                    "url": a.url,
                    "related": a.related,
                }),
            )
        }))
    }

    async fn from_wikipedia(&self, query: &str) -> SearchResult<Option<ActionResult>> {
        let Some(page) = self.resolve_page(query).await? else {
            return Ok(None);
        };
        let text = first_sentences(&page.extract, FALLBACK_SENTENCES);
        Ok(Some(
            ActionResult::success(truncate_text(&text, self.config.summary_length)).with_data(
                serde_json::json!({
                    "query": query,
                    "provider": "wikipedia",
                    "abstract": text,
                    "title": page.title,
                    "url": page.url,
                }),
            ),
        ))
    }

    /// Summary for `query`, going through OpenSearch when the exact title
    /// is missing or ambiguous.
    async fn resolve_page(&self, query: &str) -> SearchResult<Option<PageSummary>> {
        if let Some(page) = self.summary(query).await?
            && page.kind == PageKind::Standard
        {
            return Ok(Some(page));
        }
        for title in self.suggestions(query).await? {
            if let Some(page) = self.summary(&title).await?
                && page.kind == PageKind::Standard
            {
                return Ok(Some(page));
            }
        }
        Ok(None)
    }

    async fn summary(&self, title: &str) -> SearchResult<Option<PageSummary>> {
        wikipedia::page_summary(&self.client, &self.config.wikipedia_rest_url, title).await
    }

    async fn suggestions(&self, query: &str) -> SearchResult<Vec<String>> {
        wikipedia::opensearch(
            &self.client,
            &self.config.wikipedia_api_url,
            query,
            self.config.max_results,
        )
        .await
    }

    fn page_result(page: &PageSummary, sentences: usize, prefix: Option<&str>) -> ActionResult {
        let text = first_sentences(&page.extract, sentences);
        let summary = match prefix {
            Some(option) => format!("Found information about {option}: {text}"),
            None => text,
        };
        ActionResult::success(summary).with_data(serde_json::json!({
            "title": page.title,
            "url": page.url,
        }))
    }

    /// Disambiguation page: take the first concrete candidate.
    async fn resolve_ambiguous(&self, query: &str, page: &PageSummary) -> ActionResult {
        let ambiguous = ActionResult::clarify(format!(
            "I found multiple topics for '{query}'. Could you be more specific?"
        ));
        let candidates = match self.suggestions(query).await {
            Ok(c) => c,
            Err(e) => return ambiguous.with_error(e.to_string()),
        };
        let Some(option) = candidates.into_iter().find(|t| *t != page.title) else {
            return ambiguous;
        };
        match self.summary(&option).await {
            Ok(Some(p)) if p.kind == PageKind::Standard => {
                Self::page_result(&p, FALLBACK_SENTENCES, Some(&option))
            }
            Ok(_) => ambiguous,
            Err(e) => ambiguous.with_error(e.to_string()),
        }
    }
}

#[async_trait]
impl SearchService for WebSearcher {
    async fn search_web(&self, query: &str) -> ActionResult {
        let query = query.trim();

        match self.from_duckduckgo(query).await {
            Ok(Some(result)) => return result,
            Ok(None) => tracing::debug!(query, "no instant answer, trying wikipedia"),
            Err(e) => tracing::warn!(query, error = %e, "duckduckgo lookup failed"),
        }

        match self.from_wikipedia(query).await {
            Ok(Some(result)) => return result,
            Ok(None) => tracing::debug!(query, "no wikipedia page"),
            Err(e) => tracing::warn!(query, error = %e, "wikipedia fallback failed"),
        }

        ActionResult::clarify(format!(
            "I couldn't find reliable information about '{query}'. Please try rephrasing your search."
        ))
    }

    async fn search_wikipedia(&self, query: &str) -> ActionResult {
        let query = query.trim();
        let not_found = || {
            ActionResult::clarify(format!("I couldn't find a Wikipedia page for '{query}'."))
        };
        let errored = |e: crate::SearchError| {
            tracing::warn!(query, error = %e, "wikipedia lookup failed");
            ActionResult::failure(format!("Error searching Wikipedia for '{query}'."), e.to_string())
        };

        match self.summary(query).await {
            Ok(Some(page)) if page.kind == PageKind::Disambiguation => {
                self.resolve_ambiguous(query, &page).await
            }
            Ok(Some(page)) if page.kind == PageKind::Standard => {
                Self::page_result(&page, WIKIPEDIA_SENTENCES, None)
            }
            Ok(_) => match self.resolve_page(query).await {
                Ok(Some(page)) => Self::page_result(&page, WIKIPEDIA_SENTENCES, None),
                Ok(None) => not_found(),
                Err(e) => errored(e),
            },
            Err(e) => errored(e),
        }
    }

    async fn get_news_headlines(&self, topic: &str) -> ActionResult {
        let topic = match topic.trim().to_lowercase() {
            t if t.is_empty() => DEFAULT_TOPIC.to_string(),
            t => t,
        };
        let failed = format!("I couldn't fetch {topic} news right now.");

        let Some(feed) = self.config.feed_for(&topic) else {
            return ActionResult::failure(failed, "no news feeds configured");
        };

        match news::fetch_headlines(&self.client, feed, FEED_ITEMS).await {
            Ok(headlines) if !headlines.is_empty() => {
                let spoken: Vec<&str> = headlines
                    .iter()
                    .take(self.config.max_results)
                    .map(|h| h.title.as_str())
                    .collect();
                let summary = format!(
                    "Here are the latest {topic} headlines: {}",
                    spoken.join(". ")
                );
                ActionResult::success(summary).with_data(serde_json::json!({
                    "topic": topic,
                    "headlines": headlines,
                }))
            }
            Ok(_) => ActionResult::failure(failed, "feed had no items"),
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "news fetch failed");
                ActionResult::failure(failed, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn searcher(server: &MockServer) -> WebSearcher {
        WebSearcher::new(SearchConfig::with_base_url(&server.uri())).unwrap()
    }

    async fn mount_summary(server: &MockServer, title: &str, kind: &str, extract: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/wiki/rest/page/summary/{title}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": kind,
                "title": title.replace('_', " "),
                "extract": extract,
                "content_urls": { "desktop": { "page": format!("https://en.wikipedia.org/wiki/{title}") } }
            })))
            .mount(server)
            .await;
    }

    async fn mount_opensearch(server: &MockServer, query: &str, titles: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/wiki/api.php"))
            .and(query_param("search", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                query, titles, [], []
            ])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn web_search_prefers_instant_answer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ddg/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "AbstractText": "Rust is a multi-paradigm programming language.",
                "AbstractSource": "Wikipedia",
            })))
            .mount(&server)
            .await;

        let result = searcher(&server).search_web("rust").await;
        assert!(result.success);
        assert_eq!(result.summary, "Rust is a multi-paradigm programming language.");
        assert_eq!(result.data.unwrap()["provider"], "duckduckgo");
    }

    #[tokio::test]
    async fn web_search_falls_back_to_wikipedia() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ddg/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        mount_summary(&server, "Ada_Lovelace", "standard", "Ada was a mathematician. She wrote notes. More.").await;
        mount_opensearch(&server, "ada lovelace", &["Ada Lovelace"]).await;

        let result = searcher(&server).search_web("ada lovelace").await;
        assert!(result.success);
        assert_eq!(result.summary, "Ada was a mathematician. She wrote notes.");
        assert_eq!(result.data.unwrap()["provider"], "wikipedia");
    }

    #[tokio::test]
    async fn web_search_all_providers_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = searcher(&server).search_web("anything").await;
        assert!(!result.success);
        assert_eq!(
            result.summary,
            "I couldn't find reliable information about 'anything'. Please try rephrasing your search."
        );
    }

    #[tokio::test]
    async fn wikipedia_direct_hit_reads_three_sentences() {
        let server = MockServer::start().await;
        mount_summary(&server, "Mars", "standard", "One. Two. Three. Four.").await;

        let result = searcher(&server).search_wikipedia("Mars").await;
        assert!(result.success);
        assert_eq!(result.summary, "One. Two. Three.");
        assert_eq!(result.data.unwrap()["url"], "https://en.wikipedia.org/wiki/Mars");
    }

    #[tokio::test]
    async fn wikipedia_disambiguation_takes_first_option() {
        let server = MockServer::start().await;
        mount_summary(&server, "Mercury", "disambiguation", "Mercury may refer to:").await;
        mount_opensearch(&server, "Mercury", &["Mercury", "Mercury (planet)"]).await;
        mount_summary(&server, "Mercury_(planet)", "standard", "Mercury is a planet. It is small. Hot.").await;

        let result = searcher(&server).search_wikipedia("Mercury").await;
        assert!(result.success);
        assert_eq!(
            result.summary,
            "Found information about Mercury (planet): Mercury is a planet. It is small."
        );
    }

    #[tokio::test]
    async fn wikipedia_disambiguation_without_options() {
        let server = MockServer::start().await;
        mount_summary(&server, "Mercury", "disambiguation", "Mercury may refer to:").await;
        mount_opensearch(&server, "Mercury", &["Mercury"]).await;

        let result = searcher(&server).search_wikipedia("Mercury").await;
        assert!(!result.success);
        assert_eq!(
            result.summary,
            "I found multiple topics for 'Mercury'. Could you be more specific?"
        );
    }

    #[tokio::test]
    async fn wikipedia_missing_uses_suggestion() {
        let server = MockServer::start().await;
        mount_opensearch(&server, "turing", &["Alan Turing"]).await;
        mount_summary(&server, "Alan_Turing", "standard", "Alan Turing was a mathematician.").await;

        let result = searcher(&server).search_wikipedia("turing").await;
        assert!(result.success);
        assert_eq!(result.summary, "Alan Turing was a mathematician.");
    }

    #[tokio::test]
    async fn wikipedia_not_found() {
        let server = MockServer::start().await;
        mount_opensearch(&server, "qwxz", &[]).await;

        let result = searcher(&server).search_wikipedia("qwxz").await;
        assert!(!result.success);
        assert_eq!(result.summary, "I couldn't find a Wikipedia page for 'qwxz'.");
    }

    #[tokio::test]
    async fn wikipedia_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = searcher(&server).search_wikipedia("Mars").await;
        assert!(!result.success);
        assert_eq!(result.summary, "Error searching Wikipedia for 'Mars'.");
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn news_headlines_speak_first_three() {
        let server = MockServer::start().await;
        let feed = r#"<rss><channel>
            <item><title>A</title></item><item><title>B</title></item>
            <item><title>C</title></item><item><title>D</title></item>
        </channel></rss>"#;
        Mock::given(method("GET"))
            .and(path("/news/science.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed))
            .mount(&server)
            .await;

        let result = searcher(&server).get_news_headlines("science").await;
        assert!(result.success);
        assert_eq!(result.summary, "Here are the latest science headlines: A. B. C");
        assert_eq!(result.data.unwrap()["headlines"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn news_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = searcher(&server).get_news_headlines("").await;
        assert!(!result.success);
        assert_eq!(result.summary, "I couldn't fetch technology news right now.");
    }
}
