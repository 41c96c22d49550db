//! # Decision Engine
//! Pure, testable logic that maps ranked `ScoredArticle`s → `Decision`.
//! No I/O, no clock, suitable for unit tests and offline replays of saved
//! scans.
//!
//! Policy: aggressive. One credible hit, or a handful of non-credible ones,
//! is enough to report `true`; the tier encodes how much to trust it.
//! Tiers are evaluated in order and the first satisfied one wins.

use crate::analyze::ScoredArticle;
use crate::decision::{Decision, Tier, TOP_ARTICLES};
use crate::error::{MonitorError, Result};

/// Net score a single credible article needs for the strongest tier.
const STRONG_NET_SCORE: f32 = 3.0;
const MULTIPLE_CREDIBLE_MIN: usize = 2;
const UNVERIFIED_HITS_MIN: usize = 3;

/// Turns a ranked article set into a decision.
///
/// Implementations that leave `evaluate` unimplemented report
/// [`MonitorError::PolicyNotImplemented`], which ends continuous monitoring
/// instead of looping without ever producing a judgment.
pub trait DecisionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, ranked: &[ScoredArticle]) -> Result<Decision> {
        let _ = ranked;
        Err(MonitorError::PolicyNotImplemented(self.name()))
    }
}

/// The shipped tier cascade.
#[derive(Debug, Clone, Copy, Default)]
pub struct TieredPolicy;

impl DecisionPolicy for TieredPolicy {
    fn name(&self) -> &'static str {
        "tiered"
    }

    fn evaluate(&self, ranked: &[ScoredArticle]) -> Result<Decision> {
        Ok(make_decision(ranked))
    }
}

/// Apply the tier cascade. `ranked` must already be sorted by net score,
/// highest first (see [`crate::analyze::rank`]).
pub fn make_decision(ranked: &[ScoredArticle]) -> Decision {
    // 1) Hits keep the ranked order
    let hits: Vec<&ScoredArticle> = ranked.iter().filter(|a| a.is_hit()).collect();
    let credible_hits: Vec<&ScoredArticle> =
        hits.iter().copied().filter(|a| a.is_credible).collect();
    let top: Vec<ScoredArticle> = hits.iter().take(TOP_ARTICLES).map(|a| (*a).clone()).collect();

    // 2) Cascade
    if hits
        .iter()
        .any(|a| a.is_credible && a.net_score >= STRONG_NET_SCORE)
    {
        let reason = format!(
            "Strong signal from credible source ({})",
            source_label(credible_hits.first().copied())
        );
        return Decision::new(Tier::StrongCredible, reason, top);
    }

    if credible_hits.len() >= MULTIPLE_CREDIBLE_MIN {
        let reason = format!("{} credible sources reporting", credible_hits.len());
        return Decision::new(Tier::MultipleCredible, reason, top);
    }

    if let Some(&first) = credible_hits.first() {
        let reason = format!("Early signal from {}", source_label(Some(first)));
        return Decision::new(Tier::SingleCredible, reason, top);
    }

    if hits.len() >= UNVERIFIED_HITS_MIN {
        // ASCII only for stable console output
        let reason = format!(
            "{} sources reporting (none yet credible - verify manually)",
            hits.len()
        );
        return Decision::new(Tier::UnverifiedVolume, reason, top);
    }

    let reason = if hits.is_empty() {
        "No relevant articles found".to_string()
    } else {
        format!("No credible signals ({} weak hits)", hits.len())
    };
    Decision::new(Tier::None, reason, top)
}

fn source_label(a: Option<&ScoredArticle>) -> &str {
    match a.map(|a| a.source().trim()) {
        Some(s) if !s.is_empty() => s,
        _ => "unknown",
    }
}
