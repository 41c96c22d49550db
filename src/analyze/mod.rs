// src/analyze/mod.rs
//! Article analysis: compiled signal rules and the per-article scorer.

pub mod rules;
pub mod scoring;

pub use crate::analyze::rules::SignalRules;
pub use crate::analyze::scoring::{rank, score_all, score_article, ScoredArticle};
