use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Monitor: US strikes Iran.
#[derive(Debug, Parser)]
#[command(name = "strike-monitor", version, about = "Monitor: US strikes Iran")]
pub struct Cli {
    /// Run a single check and exit
    #[arg(long)]
    pub once: bool,

    /// Seconds between checks
    #[arg(long, default_value_t = 300)]
    pub interval: u64,

    /// Skip NewsData.io (RSS only)
    #[arg(long)]
    pub no_newsdata: bool,

    /// Rule set / query config (TOML)
    #[arg(long, env = "MONITOR_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Directory for scan_*.json records
    #[arg(long, env = "MONITOR_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Expose Prometheus metrics on this address
    #[arg(long, env = "MONITOR_METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,
}
