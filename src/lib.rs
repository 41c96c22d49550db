// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod history;
pub mod ingest;
pub mod metrics;
pub mod monitor;
pub mod recency;
pub mod scheduler;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{ScoredArticle, SignalRules};
pub use crate::config::{MonitorConfig, Settings};
pub use crate::decision::{Decision, Tier};
pub use crate::engine::{make_decision, DecisionPolicy, TieredPolicy};
pub use crate::error::MonitorError;
pub use crate::ingest::types::{Article, NewsSource, RawEntry};
pub use crate::monitor::{CheckReport, Monitor};
pub use crate::scheduler::{run_continuous, LoopExit};
