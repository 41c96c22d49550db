// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{Article, NewsSource, RawEntry};
use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Normalize markup text (descriptions): strip tags, decode entities,
/// fold quotes, collapse whitespace. Nothing is truncated; the scorer sees
/// the full text.
pub fn normalize_text(s: &str) -> String {
    // Tags come off the raw text so escaped brackets (&lt; &gt;) survive as text
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS
        .get_or_init(|| Regex::new(r"(?is)<(?:/?[a-z][^<>]*|!--.*?--)>").expect("tag regex"));
    let stripped = re_tags.replace_all(s, " ");
    normalize_plain(&stripped)
}

/// Normalize plain text (titles, publisher names). Angle brackets are content
/// here, never markup.
pub fn normalize_plain(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 3) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Turn an adapter entry into an [`Article`]. Entries without a link cannot be
/// deduplicated and are dropped.
pub fn normalize_entry(raw: RawEntry) -> Option<Article> {
    let link = raw.link.as_deref().map(str::trim).unwrap_or_default();
    if link.is_empty() {
        return None;
    }
    Some(Article {
        title: normalize_plain(raw.title.as_deref().unwrap_or_default()),
        description: normalize_text(raw.description.as_deref().unwrap_or_default()),
        link: link.to_string(),
        source: normalize_plain(raw.source.as_deref().unwrap_or_default()).to_lowercase(),
        published: raw.published.unwrap_or_default().trim().to_string(),
    })
}

/// Substring match of the (lower-cased) source against the ignore list.
pub fn is_ignored_source(source: &str, ignored: &[String]) -> bool {
    let s = source.to_lowercase();
    ignored.iter().any(|ign| s.contains(ign.as_str()))
}

/// Keep only articles whose link is not in `seen`, recording new links.
/// Returns (kept, duplicates_dropped).
pub fn retain_unseen(seen: &mut HashSet<String>, articles: Vec<Article>) -> (Vec<Article>, usize) {
    let mut dups = 0usize;
    let mut keep = Vec::with_capacity(articles.len());
    for a in articles {
        if seen.insert(a.link.clone()) {
            keep.push(a);
        } else {
            dups += 1;
        }
    }
    (keep, dups)
}

/// Normalize a batch of raw entries and drop ignored publishers.
/// Returns (articles, ignored_count).
pub fn normalize_batch(raw: Vec<RawEntry>, ignored: &[String]) -> (Vec<Article>, usize) {
    let mut dropped = 0usize;
    let mut out = Vec::with_capacity(raw.len());
    for entry in raw {
        match normalize_entry(entry) {
            Some(a) if !is_ignored_source(&a.source, ignored) => out.push(a),
            _ => dropped += 1,
        }
    }
    (out, dropped)
}

/// Bookkeeping for one polling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollStats {
    pub queries: usize,
    pub errors: usize,
    pub ignored: usize,
    pub duplicates: usize,
}

/// Run every query against `source` in order, deduplicating by link across
/// queries. A failing query is logged and contributes nothing.
pub async fn poll_queries(
    source: &dyn NewsSource,
    queries: &[String],
    ignored: &[String],
    seen: &mut HashSet<String>,
) -> (Vec<Article>, PollStats) {
    crate::metrics::ensure_described();

    let mut stats = PollStats {
        queries: queries.len(),
        ..Default::default()
    };
    let mut all = Vec::new();

    for q in queries {
        let raw = match source.search(q).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = ?e, provider = source.name(), query = %q, "provider error");
                counter!("monitor_provider_errors_total", "source" => source.name()).increment(1);
                stats.errors += 1;
                continue;
            }
        };
        let (articles, ignored_cnt) = normalize_batch(raw, ignored);
        let (mut fresh, dups) = retain_unseen(seen, articles);
        stats.ignored += ignored_cnt;
        stats.duplicates += dups;
        all.append(&mut fresh);
    }

    counter!("monitor_articles_fetched_total", "source" => source.name())
        .increment(all.len() as u64);
    counter!("monitor_articles_ignored_total").increment(stats.ignored as u64);
    counter!("monitor_dedup_total").increment(stats.duplicates as u64);

    tracing::info!(
        target: "ingest",
        provider = source.name(),
        unique = all.len(),
        ignored = stats.ignored,
        duplicates = stats.duplicates,
        errors = stats.errors,
        "poll finished"
    );

    (all, stats)
}
