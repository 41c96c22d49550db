// src/ingest/providers/newsdata.rs
//! NewsData.io `latest` endpoint. Metered (200 credits/day on the free tier),
//! so the orchestrator only calls it to confirm a positive RSS signal.
//!
//! Missing credential and transport/HTTP/decode failures all come back as an
//! empty result, never as an error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;
use std::time::Duration;

use crate::ingest::types::{NewsSource, RawEntry};

pub const NEWSDATA_LATEST_URL: &str = "https://newsdata.io/api/1/latest";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    results: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    source_id: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

pub struct NewsDataProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        endpoint: String,
        api_key: Option<String>,
        client: reqwest::Client,
        timeout: Duration,
    },
}

impl NewsDataProvider {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            mode: Mode::Fixture(content.to_string()),
        }
    }

    /// Live client; an empty or absent key disables the source.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(NEWSDATA_LATEST_URL, api_key)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            mode: Mode::Http {
                endpoint: endpoint.into(),
                api_key: api_key.filter(|k| !k.trim().is_empty()),
                client: reqwest::Client::new(),
                timeout: Duration::from_secs(15),
            },
        }
    }

    pub fn has_credential(&self) -> bool {
        match &self.mode {
            Mode::Fixture(_) => true,
            Mode::Http { api_key, .. } => api_key.is_some(),
        }
    }

    /// Parse a `latest` response body into raw entries.
    pub fn parse_response(body: &str) -> Result<Vec<RawEntry>> {
        let t0 = std::time::Instant::now();
        let resp: LatestResponse =
            serde_json::from_str(body).context("parsing newsdata response json")?;

        let out: Vec<RawEntry> = resp
            .results
            .into_iter()
            .map(|it| RawEntry {
                title: it.title,
                description: it.description,
                link: it.link,
                source: it.source_id,
                published: it.pub_date,
            })
            .collect();

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("monitor_parse_ms", "source" => "newsdata").record(ms);
        Ok(out)
    }

    async fn fetch(
        client: &reqwest::Client,
        endpoint: &str,
        api_key: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<Vec<RawEntry>> {
        let resp = client
            .get(endpoint)
            .query(&[("apikey", api_key), ("q", query), ("language", "en")])
            .timeout(timeout)
            .send()
            .await;
        let body = match resp.and_then(|r| r.error_for_status()) {
            Ok(r) => r.text().await.context("newsdata http .text()")?,
            Err(e) => {
                counter!("monitor_provider_http_errors_total", "source" => "newsdata").increment(1);
                return Err(e).context("newsdata http get()");
            }
        };
        Self::parse_response(&body)
    }
}

#[async_trait]
impl NewsSource for NewsDataProvider {
    async fn search(&self, query: &str) -> Result<Vec<RawEntry>> {
        match &self.mode {
            Mode::Fixture(s) => Ok(Self::parse_response(s).unwrap_or_else(|e| {
                tracing::error!(error = ?e, provider = "newsdata", "fixture parse failed");
                Vec::new()
            })),
            Mode::Http {
                endpoint,
                api_key,
                client,
                timeout,
            } => {
                let Some(key) = api_key else {
                    tracing::warn!(provider = "newsdata", "no NEWSDATA_API_KEY set, skipping NewsData.io search");
                    return Ok(Vec::new());
                };
                match Self::fetch(client, endpoint, key, query, *timeout).await {
                    Ok(v) => {
                        tracing::info!(provider = "newsdata", returned = v.len(), "NewsData.io search finished");
                        Ok(v)
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, provider = "newsdata", "NewsData.io request failed");
                        counter!("monitor_provider_errors_total", "source" => "newsdata").increment(1);
                        Ok(Vec::new())
                    }
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "newsdata"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_results_and_tolerates_nulls() {
        let body = r#"{
            "status": "success",
            "totalResults": 2,
            "results": [
                {"title": "US strikes Iran", "description": "Officials confirmed.",
                 "link": "https://a/1", "source_id": "reuters", "pubDate": "2025-10-13 12:00:00"},
                {"title": "Something", "description": null,
                 "link": "https://a/2", "source_id": null, "pubDate": null}
            ],
            "nextPage": null
        }"#;
        let out = NewsDataProvider::parse_response(body).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].source.as_deref(), Some("reuters"));
        assert_eq!(out[0].description.as_deref(), Some("Officials confirmed."));
        assert!(out[1].description.is_none());
        assert!(out[1].source.is_none());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        assert!(!NewsDataProvider::new(Some("  ".into())).has_credential());
        assert!(!NewsDataProvider::new(None).has_credential());
        assert!(NewsDataProvider::new(Some("k".into())).has_credential());
    }

    #[tokio::test]
    async fn missing_key_returns_empty_without_network() {
        // Unroutable endpoint: would fail if a request were attempted.
        let p = NewsDataProvider::with_endpoint("http://127.0.0.1:9/latest", None);
        let out = p.search("US strike Iran").await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_reported_as_empty() {
        let p = NewsDataProvider::with_endpoint("http://127.0.0.1:9/latest", Some("k".into()));
        let out = p.search("US strike Iran").await.unwrap();
        assert!(out.is_empty());
    }
}
