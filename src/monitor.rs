//! Check orchestrator: one cycle of fetch → dedup → recency → score → rank →
//! (optional) confirm with the secondary source → decide.
//!
//! Holds no decision logic of its own and no state between cycles; every
//! collection built here is dropped when `check_once` returns.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics::{counter, gauge};
use serde::Serialize;

use crate::analyze::{rank, score_all, ScoredArticle, SignalRules};
use crate::config::MonitorConfig;
use crate::decision::Decision;
use crate::engine::{DecisionPolicy, TieredPolicy};
use crate::error::Result;
use crate::ingest::types::NewsSource;
use crate::ingest::{normalize_batch, poll_queries, retain_unseen, PollStats};
use crate::recency::filter_recent;

/// Everything one cycle produced.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub decision: Decision,
    /// Full ranked article set, primary and secondary merged.
    pub articles: Vec<ScoredArticle>,
    /// Unique primary articles.
    pub total_scanned: usize,
    /// Primary articles inside the recency window.
    pub total_recent: usize,
    pub secondary_used: bool,
    /// Primary polling bookkeeping (failed queries, ignored, duplicates).
    pub poll: PollStats,
}

impl CheckReport {
    pub fn total_with_signal(&self) -> usize {
        self.articles.iter().filter(|a| a.is_hit()).count()
    }
}

pub struct Monitor {
    rules: Arc<SignalRules>,
    rss_queries: Vec<String>,
    secondary_query: String,
    max_age: Duration,
    primary: Box<dyn NewsSource>,
    secondary: Option<Box<dyn NewsSource>>,
    policy: Box<dyn DecisionPolicy>,
}

impl Monitor {
    pub fn new(cfg: &MonitorConfig, rules: Arc<SignalRules>, primary: Box<dyn NewsSource>) -> Self {
        Self {
            rules,
            rss_queries: cfg.search.rss_queries.clone(),
            secondary_query: cfg.search.newsdata_query.clone(),
            max_age: cfg.max_age(),
            primary,
            secondary: None,
            policy: Box::new(TieredPolicy),
        }
    }

    /// Enable the budget-limited confirmation source.
    pub fn with_secondary(mut self, source: Box<dyn NewsSource>) -> Self {
        self.secondary = Some(source);
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn DecisionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub async fn check_once(&self) -> Result<CheckReport> {
        self.check_once_at(Utc::now()).await
    }

    /// Run one cycle with `now` as the recency reference.
    pub async fn check_once_at(&self, now: DateTime<Utc>) -> Result<CheckReport> {
        let ignored = self.rules.ignored_sources();

        // 1) Primary, deduplicated across queries
        let mut seen: HashSet<String> = HashSet::new();
        let (primary, poll) =
            poll_queries(self.primary.as_ref(), &self.rss_queries, ignored, &mut seen).await;
        let total_scanned = primary.len();
        if poll.queries > 0 && poll.errors == poll.queries {
            tracing::warn!(queries = poll.queries, "every primary query failed, deciding on no evidence");
        }

        // 2) Recency
        let recent = filter_recent(&primary, now, self.max_age);
        let total_recent = recent.len();
        counter!("monitor_articles_recent_total").increment(total_recent as u64);
        tracing::info!(
            scanned = total_scanned,
            recent = total_recent,
            max_age_hours = self.max_age.num_hours(),
            "filtered to recent articles"
        );

        // 3) Score + rank
        let mut scored = rank(score_all(&recent, &self.rules));

        // 4) Confirm with the secondary only when the primary already has a signal
        let top_score = scored.first().map(|a| a.net_score).unwrap_or(0.0);
        let mut secondary_used = false;
        if let Some(secondary) = self.secondary.as_deref() {
            if top_score > 0.0 {
                tracing::info!(top_score, "primary found positive signals, confirming with secondary");
                secondary_used = true;
                let raw = match secondary.search(&self.secondary_query).await {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::error!(error = ?e, provider = secondary.name(), "secondary fetch failed");
                        counter!("monitor_provider_errors_total", "source" => secondary.name())
                            .increment(1);
                        Vec::new()
                    }
                };
                let (articles, _ignored) = normalize_batch(raw, ignored);
                let (fresh, dups) = retain_unseen(&mut seen, articles);
                counter!("monitor_articles_fetched_total", "source" => secondary.name())
                    .increment(fresh.len() as u64);
                counter!("monitor_dedup_total").increment(dups as u64);

                scored.extend(score_all(&fresh, &self.rules));
                scored = rank(scored);
            } else {
                tracing::debug!(top_score, "no positive primary signal, secondary skipped");
            }
        }

        // 5) Decide
        let decision = self.policy.evaluate(&scored)?;
        tracing::info!(
            result = decision.result,
            confidence = decision.confidence,
            tier = ?decision.tier,
            reason = %decision.reason,
            "check decided"
        );
        counter!("monitor_checks_total").increment(1);
        gauge!("monitor_last_confidence").set(decision.confidence as f64);
        gauge!("monitor_last_check_ts").set(now.timestamp() as f64);

        Ok(CheckReport {
            decision,
            articles: scored,
            total_scanned,
            total_recent,
            secondary_used,
            poll,
        })
    }
}
