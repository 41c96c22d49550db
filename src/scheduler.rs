// src/scheduler.rs
use std::time::Duration;

use chrono::Utc;
use metrics::counter;

use crate::decision::Decision;
use crate::error::MonitorError;
use crate::history::{CheckSummary, ScanSink};
use crate::monitor::Monitor;

/// Why continuous monitoring stopped.
#[derive(Debug)]
pub enum LoopExit {
    /// A cycle produced a positive decision.
    Detected(Decision),
    /// The decision policy cannot produce judgments; looping would never end.
    Fatal(MonitorError),
}

/// Run check cycles every `interval` until a positive decision or a fatal
/// error. Failed cycles (fetch, persistence, anything non-fatal) are logged
/// and retried on the next tick; nothing carries over between cycles.
pub async fn run_continuous(monitor: &Monitor, sink: &dyn ScanSink, interval: Duration) -> LoopExit {
    tracing::info!(interval_secs = interval.as_secs(), "starting monitor");

    loop {
        match run_cycle(monitor, sink).await {
            Ok(Some(decision)) => {
                tracing::warn!("*** ALERT: US STRIKE ON IRAN DETECTED ***");
                tracing::warn!("Confidence: {:.0}%", decision.confidence * 100.0);
                tracing::warn!("Reason: {}", decision.reason);
                return LoopExit::Detected(decision);
            }
            Ok(None) => {}
            Err(e) if e.is_fatal() => {
                tracing::error!(error = %e, "decision logic unavailable, stopping monitor");
                return LoopExit::Fatal(e);
            }
            Err(e) => {
                counter!("monitor_check_failures_total").increment(1);
                tracing::error!(error = ?e, "check failed");
            }
        }

        tokio::time::sleep(interval).await;
    }
}

/// One cycle: check, persist, print. Returns the decision when positive.
async fn run_cycle(monitor: &Monitor, sink: &dyn ScanSink) -> Result<Option<Decision>, MonitorError> {
    let report = monitor.check_once().await?;
    sink.store(&report).await?;

    let summary = CheckSummary::new(&report).at(Utc::now()).to_pretty_json()?;
    println!("{summary}");

    Ok(report.decision.result.then(|| report.decision.clone()))
}
