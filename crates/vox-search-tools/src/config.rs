//! Search endpoint configuration (the `[search]` table of the agent config).

use serde::Deserialize;
use std::collections::BTreeMap;

/// Topic used when a news request names none.
pub const DEFAULT_TOPIC: &str = "technology";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// DuckDuckGo instant answer endpoint.
    #[serde(default = "default_duckduckgo_url")]
    pub duckduckgo_url: String,
    /// Wikipedia REST API base (page summaries).
    #[serde(default = "default_wikipedia_rest_url")]
    pub wikipedia_rest_url: String,
    /// Wikipedia action API (OpenSearch title suggestions).
    #[serde(default = "default_wikipedia_api_url")]
    pub wikipedia_api_url: String,
    /// News topic → RSS feed URL.
    #[serde(default = "default_news_feeds")]
    pub news_feeds: BTreeMap<String, String>,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Related links / headlines kept per answer.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Spoken answers are cut to this many characters.
    #[serde(default = "default_summary_length")]
    pub summary_length: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_duckduckgo_url() -> String {
    "https://api.duckduckgo.com/".into()
}
fn default_wikipedia_rest_url() -> String {
    "https://en.wikipedia.org/api/rest_v1".into()
}
fn default_wikipedia_api_url() -> String {
    "https://en.wikipedia.org/w/api.php".into()
}
fn default_news_feeds() -> BTreeMap<String, String> {
    [
        ("technology", "https://feeds.bbci.co.uk/news/technology/rss.xml"),
        ("science", "https://feeds.bbci.co.uk/news/science_and_environment/rss.xml"),
        ("business", "https://feeds.bbci.co.uk/news/business/rss.xml"),
        ("world", "https://feeds.bbci.co.uk/news/world/rss.xml"),
    ]
    .into_iter()
    .map(|(topic, url)| (topic.to_string(), url.to_string()))
    .collect()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_max_results() -> usize {
    3
}
fn default_summary_length() -> usize {
    200
}
fn default_user_agent() -> String {
    concat!("vox-assistant/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            duckduckgo_url: default_duckduckgo_url(),
            wikipedia_rest_url: default_wikipedia_rest_url(),
            wikipedia_api_url: default_wikipedia_api_url(),
            news_feeds: default_news_feeds(),
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
            summary_length: default_summary_length(),
            user_agent: default_user_agent(),
        }
    }
}

impl SearchConfig {
    /// Point every endpoint at one base URL (mock servers in tests).
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let mut config = Self {
            duckduckgo_url: format!("{base}/ddg/"),
            wikipedia_rest_url: format!("{base}/wiki/rest"),
            wikipedia_api_url: format!("{base}/wiki/api.php"),
            timeout_secs: 2,
            ..Self::default()
        };
        for (topic, url) in config.news_feeds.iter_mut() {
            *url = format!("{base}/news/{topic}.xml");
        }
        config
    }

    /// Feed URL for `topic`, falling back to the default topic's feed.
    pub fn feed_for(&self, topic: &str) -> Option<&str> {
        self.news_feeds
            .get(topic)
            .or_else(|| self.news_feeds.get(DEFAULT_TOPIC))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_results, 3);
        assert_eq!(config.summary_length, 200);
        assert_eq!(config.news_feeds.len(), 4);
        assert!(config.user_agent.starts_with("vox-assistant/"));
    }

    #[test]
    fn unknown_topic_uses_technology_feed() {
        let config = SearchConfig::default();
        assert_eq!(
            config.feed_for("sports"),
            Some("https://feeds.bbci.co.uk/news/technology/rss.xml")
        );
        assert_eq!(
            config.feed_for("world"),
            Some("https://feeds.bbci.co.uk/news/world/rss.xml")
        );
    }

    #[test]
    fn base_url_rewrites_every_endpoint() {
        let config = SearchConfig::with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.duckduckgo_url, "http://127.0.0.1:9000/ddg/");
        assert_eq!(config.wikipedia_rest_url, "http://127.0.0.1:9000/wiki/rest");
        assert_eq!(
            config.feed_for("science"),
            Some("http://127.0.0.1:9000/news/science.xml")
        );
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let config: SearchConfig = serde_json::from_value(serde_json::json!({
            "summary_length": 120,
            "news_feeds": { "technology": "http://feeds.local/tech.xml" }
        }))
        .unwrap();
        assert_eq!(config.summary_length, 120);
        assert_eq!(config.news_feeds.len(), 1);
        assert_eq!(config.max_results, 3);
    }
}
