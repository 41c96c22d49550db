//! Recency filter.
//!
//! An article is recent when its publication instant lies at or after
//! `now - max_age`. Timestamps that cannot be parsed are kept (fail open).

use chrono::{DateTime, Duration, Utc};

use crate::ingest::types::Article;

/// Parse an RSS (`RFC 2822`) or `RFC 3339` timestamp into UTC.
pub fn parse_published(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Future timestamps count as recent (publisher clock skew).
pub fn is_recent_at(article: &Article, now: DateTime<Utc>, max_age: Duration) -> bool {
    match parse_published(&article.published) {
        Some(published) => published >= now - max_age,
        None => true,
    }
}

pub fn filter_recent(articles: &[Article], now: DateTime<Utc>, max_age: Duration) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| is_recent_at(a, now, max_age))
        .cloned()
        .collect()
}
