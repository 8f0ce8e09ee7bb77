//! DuckDuckGo instant answer API.

use serde::{Deserialize, Serialize};

use crate::error::SearchResult;
use crate::providers::check_status;

/// A link related to the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedLink {
    pub text: String,
    pub url: String,
}

/// The best short answer DuckDuckGo has for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantAnswer {
    pub text: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub related: Vec<RelatedLink>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractSource", default)]
    abstract_source: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "Definition", default)]
    definition: String,
    #[serde(rename = "DefinitionURL", default)]
    definition_url: String,
    /// Usually a string, occasionally an object for calculator-style answers.
    #[serde(rename = "Answer", default)]
    answer: serde_json::Value,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<serde_json::Value>,
}

/// Query the instant answer API. `Ok(None)` when it has nothing to say.
pub async fn instant_answer(
    client: &reqwest::Client,
    endpoint: &str,
    query: &str,
    max_related: usize,
) -> SearchResult<Option<InstantAnswer>> {
    let response = client
        .get(endpoint)
        .query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ])
        .send()
        .await?;
    let body: ApiResponse = check_status(response)?.json().await?;
    Ok(pick_answer(body, max_related))
}

fn pick_answer(body: ApiResponse, max_related: usize) -> Option<InstantAnswer> {
    let related = collect_related(&body.related_topics, max_related);

    let (text, source, url) = if !body.abstract_text.trim().is_empty() {
        (
            body.abstract_text,
            non_empty(body.abstract_source),
            non_empty(body.abstract_url),
        )
    } else if !body.definition.trim().is_empty() {
        (body.definition, None, non_empty(body.definition_url))
    } else if let Some(answer) = body.answer.as_str().filter(|a| !a.trim().is_empty()) {
        (answer.to_string(), None, None)
    } else {
        return None;
    };

    Some(InstantAnswer {
        text: text.trim().to_string(),
        source,
        url,
        related,
    })
}

/// Flatten `RelatedTopics`, which nests groups under `Topics`.
fn collect_related(topics: &[serde_json::Value], max: usize) -> Vec<RelatedLink> {
    let mut out = Vec::new();
    let mut stack: Vec<&serde_json::Value> = topics.iter().rev().collect();
    while let Some(topic) = stack.pop() {
        if out.len() >= max {
            break;
        }
        if let Some(children) = topic.get("Topics").and_then(|t| t.as_array()) {
            stack.extend(children.iter().rev());
            continue;
        }
        if let (Some(text), Some(url)) = (
            topic.get("Text").and_then(|t| t.as_str()),
            topic.get("FirstURL").and_then(|u| u.as_str()),
        ) {
            out.push(RelatedLink {
                text: text.to_string(),
                url: url.to_string(),
            });
        }
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}
