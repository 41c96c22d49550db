//! strike-monitor: Binary Entrypoint
//! Loads config, wires the news sources and runs one check or the
//! continuous loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use strike_monitor::cli::Cli;
use strike_monitor::history::{CheckSummary, JsonFileSink, ScanSink};
use strike_monitor::ingest::providers::{GoogleNewsProvider, NewsDataProvider};
use strike_monitor::metrics as monitor_metrics;
use strike_monitor::{run_continuous, LoopExit, Monitor, MonitorConfig, Settings, SignalRules};

/// Logs go to stderr so stdout carries only the summary JSON.
/// `MONITOR_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("strike_monitor=info,warn"));

    let json = std::env::var("MONITOR_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    if let Some(addr) = cli.metrics_addr {
        monitor_metrics::install_exporter(addr)?;
    }

    let cfg = match &cli.config {
        Some(p) => MonitorConfig::load_from(p)?,
        None => MonitorConfig::load_default()?,
    };
    let rules = Arc::new(SignalRules::compile(&cfg).context("compiling signal rules")?);
    let settings = Settings::from_env();

    let mut monitor = Monitor::new(&cfg, rules, Box::new(GoogleNewsProvider::live()));
    if !cli.no_newsdata {
        monitor = monitor.with_secondary(Box::new(NewsDataProvider::new(
            settings.newsdata_api_key.clone(),
        )));
    }

    let sink = JsonFileSink::new(&cli.log_dir);

    if cli.once {
        let report = monitor.check_once().await?;
        let path = sink.store(&report).await?;
        println!("{}", CheckSummary::new(&report).to_pretty_json()?);
        println!("\nFull results with all articles saved to: {path}");
        return Ok(());
    }

    match run_continuous(&monitor, &sink, Duration::from_secs(cli.interval)).await {
        LoopExit::Detected(_) => Ok(()),
        LoopExit::Fatal(e) => Err(e.into()),
    }
}
