//! RSS headline fetching.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;

use crate::error::{SearchError, SearchResult};
use crate::providers::check_status;
use crate::text::{squash_whitespace, truncate_text};

/// Item descriptions are cut to this many characters.
const DESCRIPTION_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Copy)]
enum Field {
    Title,
    Description,
}

/// Fetch a feed and return up to `limit` headlines.
pub async fn fetch_headlines(
    client: &reqwest::Client,
    feed_url: &str,
    limit: usize,
) -> SearchResult<Vec<Headline>> {
    let response = client.get(feed_url).send().await?;
    let body = check_status(response)?.text().await?;
    parse_rss(&body, limit)
}

/// Parse `<item>` titles and descriptions out of an RSS 2.0 document.
pub fn parse_rss(xml: &str, limit: usize) -> SearchResult<Vec<Headline>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut headlines = Vec::new();
    let mut in_item = false;
    let mut field: Option<Field> = None;
    let mut title = String::new();
    let mut description = String::new();

    while headlines.len() < limit {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => {
                    in_item = true;
                    title.clear();
                    description.clear();
                }
                b"title" if in_item => field = Some(Field::Title),
                b"description" if in_item => field = Some(Field::Description),
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Some(f) = field {
                    let text = t
                        .unescape()
                        .map_err(|e| SearchError::Feed(e.to_string()))?;
                    push_text(f, &text, &mut title, &mut description);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(f) = field {
                    let raw = c.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    push_text(f, &text, &mut title, &mut description);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => {
                    in_item = false;
                    field = None;
                    let title = squash_whitespace(&title);
                    headlines.push(Headline {
                        title: if title.is_empty() {
                            "No title".to_string()
                        } else {
                            title
                        },
                        description: truncate_text(&squash_whitespace(&description), DESCRIPTION_LENGTH),
                    });
                }
                b"title" | b"description" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SearchError::Feed(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    Ok(headlines)
}

fn push_text(field: Field, text: &str, title: &mut String, description: &mut String) {
    let target = match field {
        Field::Title => title,
        Field::Description => description,
    };
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}
