use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use nr_core::{Error, LookupItem, NewsLookup, Result};

const GOOGLE_NEWS_RSS: &str = "https://news.google.com/rss/search";
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ITEMS: usize = 30;

const NO_TITLE: &str = "No Title";
const NO_SUMMARY: &str = "No Summary";
const NO_DATE: &str = "No Date";
const UNKNOWN_SOURCE: &str = "Unknown Source";

/// News lookup backed by the Google News RSS search feed.
pub struct GoogleNewsLookup {
    client: Client,
    hl: String,
    gl: String,
    ceid: String,
}

impl GoogleNewsLookup {
    pub fn new() -> Self {
        Self::with_locale("en-US", "US", "US:en")
    }

    pub fn with_locale(
        hl: impl Into<String>,
        gl: impl Into<String>,
        ceid: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            hl: hl.into(),
            gl: gl.into(),
            ceid: ceid.into(),
        }
    }

    fn feed_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            GOOGLE_NEWS_RSS,
            &[
                ("q", query),
                ("hl", self.hl.as_str()),
                ("gl", self.gl.as_str()),
                ("ceid", self.ceid.as_str()),
            ],
        )
        .map_err(|e| Error::Lookup(format!("invalid feed url: {e}")))
    }

    /// Google News links are redirectors; follow them to the real article.
    /// Resolution failure keeps the feed's link.
    async fn resolve_link(&self, link: String) -> String {
        let request = self.client.head(&link).timeout(FETCH_TIMEOUT);
        match request.send().await {
            Ok(response) if response.status().is_success() => response.url().to_string(),
            Ok(response) => {
                warn!(status = %response.status(), link, "redirect resolution got non-success status");
                link
            }
            Err(e) => {
                warn!(error = %e, link, "could not resolve final url");
                link
            }
        }
    }
}

impl Default for GoogleNewsLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsLookup for GoogleNewsLookup {
    async fn lookup(&self, query: &str) -> Result<Vec<LookupItem>> {
        let url = self.feed_url(query)?;
        debug!(%url, "fetching news feed");

        let response = self.client.get(url).timeout(FETCH_TIMEOUT).send().await?;
        let bytes = response.bytes().await?;

        let mut items = entries_from_bytes(&bytes, MAX_ITEMS)?;
        for item in &mut items {
            item.link = self.resolve_link(std::mem::take(&mut item.link)).await;
        }

        debug!(query, found = items.len(), "news feed parsed");
        Ok(items)
    }
}

/// Parse feed bytes into lookup items, capped at `limit`.
pub(crate) fn entries_from_bytes(bytes: &[u8], limit: usize) -> Result<Vec<LookupItem>> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| Error::Lookup(format!("failed to parse feed: {e}")))?;

    Ok(feed
        .entries
        .into_iter()
        .take(limit)
        .map(|entry| {
            let raw_title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| NO_TITLE.to_string());
            let (title, source) = split_publisher(&raw_title);
            LookupItem {
                title,
                link: entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_else(|| "#".to_string()),
                summary: entry
                    .summary
                    .map(|s| s.content)
                    .unwrap_or_else(|| NO_SUMMARY.to_string()),
                published: entry
                    .published
                    .or(entry.updated)
                    .map(|d| d.to_rfc2822())
                    .unwrap_or_else(|| NO_DATE.to_string()),
                source: source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            }
        })
        .collect())
}

/// Google News titles carry the publisher as a " - Publisher" suffix.
fn split_publisher(title: &str) -> (String, Option<String>) {
    match title.rsplit_once(" - ") {
        Some((head, tail)) if !head.trim().is_empty() && !tail.trim().is_empty() => {
            (head.trim().to_string(), Some(tail.trim().to_string()))
        }
        _ => (title.trim().to_string(), None),
    }
}
