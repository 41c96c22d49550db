//! history.rs: persisted scan records and console summaries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::analyze::ScoredArticle;
use crate::decision::{Decision, Tier};
use crate::monitor::CheckReport;

/// On-disk shape of one check cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub ran_at: String, // RFC 3339, UTC
    pub result: bool,
    pub confidence: f32,
    pub reason: String,
    pub tier: Tier,
    pub total_scanned: usize,
    pub total_recent: usize,
    pub total_with_signal: usize,
    /// Primary queries that failed this cycle.
    #[serde(default)]
    pub failed_queries: usize,
    pub articles: Vec<ScoredArticle>,
}

impl ScanRecord {
    pub fn from_report(report: &CheckReport, ran_at: DateTime<Utc>) -> Self {
        Self {
            ran_at: ran_at.to_rfc3339(),
            result: report.decision.result,
            confidence: report.decision.confidence,
            reason: report.decision.reason.clone(),
            tier: report.decision.tier,
            total_scanned: report.total_scanned,
            total_recent: report.total_recent,
            total_with_signal: report.total_with_signal(),
            failed_queries: report.poll.errors,
            articles: report.articles.clone(),
        }
    }
}

/// Console summary: the decision plus counts, without the full article list.
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub decision: &'a Decision,
    pub total_scanned: usize,
    pub total_recent: usize,
    pub secondary_used: bool,
}

impl<'a> CheckSummary<'a> {
    pub fn new(report: &'a CheckReport) -> Self {
        Self {
            timestamp: None,
            decision: &report.decision,
            total_scanned: report.total_scanned,
            total_recent: report.total_recent,
            secondary_used: report.secondary_used,
        }
    }

    pub fn at(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts.to_rfc3339());
        self
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing check summary")
    }
}

#[async_trait::async_trait]
pub trait ScanSink: Send + Sync {
    /// Persist one report; returns where it went.
    async fn store(&self, report: &CheckReport) -> Result<String>;
}

/// Writes `scan_<local time>.json` files into a directory, creating it on demand.
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_name(at: DateTime<Local>) -> String {
        format!("scan_{}.json", at.format("%Y-%m-%d_%H-%M-%S"))
    }
}

#[async_trait::async_trait]
impl ScanSink for JsonFileSink {
    async fn store(&self, report: &CheckReport) -> Result<String> {
        let record = ScanRecord::from_report(report, Utc::now());
        let body = serde_json::to_string_pretty(&record).context("serializing scan record")?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating log dir {}", self.dir.display()))?;
        let path = self.dir.join(Self::file_name(Local::now()));
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("writing scan record {}", path.display()))?;

        tracing::info!(path = %path.display(), "results saved");
        Ok(path.display().to_string())
    }
}
