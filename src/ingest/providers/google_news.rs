// src/ingest/providers/google_news.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;

use crate::ingest::types::{NewsSource, RawEntry};

pub const GOOGLE_NEWS_SEARCH_URL: &str = "https://news.google.com/rss/search";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source: Option<Source>,
}

// <source url="https://www.reuters.com">Reuters</source>
#[derive(Debug, Deserialize)]
struct Source {
    #[serde(rename = "$text", default)]
    name: Option<String>,
}

/// Google News search feed. Free and unmetered, so it is the primary source
/// and gets polled once per configured query.
pub struct GoogleNewsProvider {
    mode: Mode,
}

enum Mode {
    // Same body for every query.
    Fixture(String),
    Http {
        base_url: String,
        client: reqwest::Client,
        timeout: Duration,
    },
}

impl GoogleNewsProvider {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            mode: Mode::Fixture(content.to_string()),
        }
    }

    pub fn from_url(base_url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Http {
                base_url: base_url.into(),
                client: reqwest::Client::new(),
                timeout: Duration::from_secs(15),
            },
        }
    }

    pub fn live() -> Self {
        Self::from_url(GOOGLE_NEWS_SEARCH_URL)
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        if let Mode::Http { timeout, .. } = &mut self.mode {
            *timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Parse a Google News RSS document into raw entries.
    pub fn parse_feed(s: &str) -> Result<Vec<RawEntry>> {
        let t0 = std::time::Instant::now();
        let rss: Rss = from_str(s).context("parsing google news rss xml")?;

        let out: Vec<RawEntry> = rss
            .channel
            .item
            .into_iter()
            .map(|it| RawEntry {
                title: it.title,
                // The feed's description is an HTML link list, not article text.
                description: None,
                link: it.link,
                source: it.source.and_then(|s| s.name),
                published: it.pub_date,
            })
            .collect();

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("monitor_parse_ms", "source" => "google_news").record(ms);
        Ok(out)
    }
}

#[async_trait]
impl NewsSource for GoogleNewsProvider {
    async fn search(&self, query: &str) -> Result<Vec<RawEntry>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_feed(s),
            Mode::Http {
                base_url,
                client,
                timeout,
            } => {
                let resp = client
                    .get(base_url.as_str())
                    .query(&[
                        ("q", query),
                        ("hl", "en-US"),
                        ("gl", "US"),
                        ("ceid", "US:en"),
                    ])
                    .timeout(*timeout)
                    .send()
                    .await;
                let body = match resp.and_then(|r| r.error_for_status()) {
                    Ok(r) => r.text().await.context("google news http .text()")?,
                    Err(e) => {
                        counter!("monitor_provider_http_errors_total", "source" => "google_news")
                            .increment(1);
                        return Err(e).context("google news http get()");
                    }
                };
                Self::parse_feed(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "google_news"
    }
}
