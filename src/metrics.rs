use std::net::SocketAddr;

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on the scrape endpoint).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "monitor_articles_fetched_total",
            "Unique articles returned by a source."
        );
        describe_counter!(
            "monitor_articles_ignored_total",
            "Entries dropped for missing link or ignored publisher."
        );
        describe_counter!("monitor_dedup_total", "Entries dropped as duplicate links.");
        describe_counter!(
            "monitor_articles_recent_total",
            "Primary articles inside the recency window."
        );
        describe_counter!(
            "monitor_provider_errors_total",
            "Source fetch/parse errors."
        );
        describe_counter!(
            "monitor_provider_http_errors_total",
            "HTTP transport or status errors."
        );
        describe_histogram!("monitor_parse_ms", "Source parse time in milliseconds.");
        describe_counter!("monitor_checks_total", "Completed check cycles.");
        describe_counter!(
            "monitor_check_failures_total",
            "Check cycles that failed and were skipped."
        );
        describe_gauge!(
            "monitor_last_confidence",
            "Confidence of the most recent decision."
        );
        describe_gauge!(
            "monitor_last_check_ts",
            "Unix ts when the last check cycle finished."
        );
    });
}

/// Install the Prometheus recorder with its own HTTP listener on `addr`.
pub fn install_exporter(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .with_context(|| format!("prometheus: install exporter on {addr}"))?;
    ensure_described();
    tracing::info!(%addr, "metrics exporter listening");
    Ok(())
}
