// src/config.rs
//! Monitor configuration: search queries, recency window and the signal rule
//! set, read from TOML once at startup.
//!
//! Resolution order:
//! 1) `$MONITOR_CONFIG_PATH` (must exist)
//! 2) `config/monitor.toml` in the working directory
//! 3) the built-in copy compiled into the binary

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";
pub const ENV_CONFIG_PATH: &str = "MONITOR_CONFIG_PATH";
pub const ENV_NEWSDATA_API_KEY: &str = "NEWSDATA_API_KEY";
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

const BUILTIN_CONFIG: &str = include_str!("../config/monitor.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub window: WindowSection,
    pub search: SearchSection,
    pub signals: SignalsSection,
    pub sources: SourcesSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowSection {
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: i64,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
        }
    }
}

fn default_max_age_hours() -> i64 {
    DEFAULT_MAX_AGE_HOURS
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    pub rss_queries: Vec<String>,
    pub newsdata_query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalsSection {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesSection {
    pub credible: Vec<String>,
    #[serde(default)]
    pub ignored: Vec<String>,
}

impl MonitorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: MonitorConfig = toml::from_str(s).context("parsing monitor config toml")?;
        cfg.sources.credible = clean_list(cfg.sources.credible);
        cfg.sources.ignored = clean_list(cfg.sources.ignored);
        cfg.search.rss_queries.retain(|q| !q.trim().is_empty());
        if cfg.window.max_age_hours <= 0 {
            return Err(anyhow!(
                "window.max_age_hours must be positive (got {})",
                cfg.window.max_age_hours
            ));
        }
        Ok(cfg)
    }

    /// The rule set shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONFIG).context("built-in monitor config")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading monitor config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Load using env var + fallbacks (see module docs).
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!(
                "{ENV_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            ));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_PATH);
        if local.exists() {
            return Self::load_from(&local);
        }
        Self::builtin()
    }

    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::hours(self.window.max_age_hours)
    }
}

/// Runtime settings that come from the environment rather than the rule file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub newsdata_api_key: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            newsdata_api_key: std::env::var(ENV_NEWSDATA_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty()),
        }
    }
}

// Lower-case, trim, drop empties, keep first-seen order.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
