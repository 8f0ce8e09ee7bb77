//! Wikipedia page summaries (REST API) and title suggestions (OpenSearch).

use serde::Deserialize;
use url::Url;

use crate::error::{SearchError, SearchResult};
use crate::providers::check_status;

/// What kind of page a summary describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Standard,
    Disambiguation,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub title: String,
    pub extract: String,
    pub url: Option<String>,
    pub kind: PageKind,
}

#[derive(Deserialize)]
struct SummaryResponse {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrl>,
}

#[derive(Deserialize)]
struct PageUrl {
    page: Option<String>,
}

/// REST summary URL for `title` under `base`.
pub fn summary_url(base: &str, title: &str) -> SearchResult<Url> {
    let mut url = Url::parse(base).map_err(|e| SearchError::InvalidUrl(format!("{base}: {e}")))?;
    let title = title.trim().replace(' ', "_");
    url.path_segments_mut()
        .map_err(|_| SearchError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(["page", "summary", title.as_str()]);
    Ok(url)
}

/// Fetch the summary of `title`. `Ok(None)` when no such page exists.
pub async fn page_summary(
    client: &reqwest::Client,
    rest_base: &str,
    title: &str,
) -> SearchResult<Option<PageSummary>> {
    let url = summary_url(rest_base, title)?;
    let response = client.get(url).send().await?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let body: SummaryResponse = check_status(response)?.json().await?;

    let kind = match body.kind.as_str() {
        "standard" => PageKind::Standard,
        "disambiguation" => PageKind::Disambiguation,
        _ => PageKind::Other,
    };
    if body.extract.trim().is_empty() && kind != PageKind::Disambiguation {
        return Ok(None);
    }
    Ok(Some(PageSummary {
        title: body.title,
        extract: body.extract.trim().to_string(),
        url: body.content_urls.and_then(|c| c.desktop).and_then(|d| d.page),
        kind,
    }))
}

/// Title suggestions for a free-text query, best first.
pub async fn opensearch(
    client: &reqwest::Client,
    api_url: &str,
    query: &str,
    limit: usize,
) -> SearchResult<Vec<String>> {
    let limit = limit.to_string();
    let response = client
        .get(api_url)
        .query(&[
            ("action", "opensearch"),
            ("search", query),
            ("limit", limit.as_str()),
            ("namespace", "0"),
            ("format", "json"),
        ])
        .send()
        .await?;
    // Shape: [query, [titles], [descriptions], [urls]]
    let body: serde_json::Value = check_status(response)?.json().await?;
    let titles = body
        .get(1)
        .and_then(|t| t.as_array())
        .ok_or_else(|| SearchError::Decode("opensearch response missing titles".into()))?;
    Ok(titles
        .iter()
        .filter_map(|t| t.as_str().map(String::from))
        .collect())
}
