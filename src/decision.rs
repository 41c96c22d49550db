//! decision.rs: Output of one check cycle's decision step.
//!
//! `confidence` is a fixed weight declared per tier, not a calibrated
//! probability.

use serde::{Deserialize, Serialize};

use crate::analyze::ScoredArticle;

/// Maximum number of evidence articles reported with a decision.
pub const TOP_ARTICLES: usize = 5;

/// Which rule of the cascade produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// One credible source with net score >= 3.
    StrongCredible,
    /// Two or more credible hits.
    MultipleCredible,
    /// Exactly one credible hit.
    SingleCredible,
    /// Three or more hits, none credible.
    UnverifiedVolume,
    None,
}

impl Tier {
    pub fn confidence(self) -> f32 {
        match self {
            Tier::StrongCredible => 0.9,
            Tier::MultipleCredible => 0.8,
            Tier::SingleCredible => 0.6,
            Tier::UnverifiedVolume => 0.4,
            Tier::None => 0.0,
        }
    }

    pub fn is_positive(self) -> bool {
        !matches!(self, Tier::None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub result: bool,
    /// In `[0.0, 1.0]`.
    pub confidence: f32,
    pub reason: String,
    pub tier: Tier,
    /// Highest-scoring hits, at most [`TOP_ARTICLES`].
    #[serde(default)]
    pub top_articles: Vec<ScoredArticle>,
}

impl Decision {
    /// Result and confidence follow from the tier.
    pub fn new(tier: Tier, reason: impl Into<String>, top_articles: Vec<ScoredArticle>) -> Self {
        Self {
            result: tier.is_positive(),
            confidence: tier.confidence(),
            reason: reason.into(),
            tier,
            top_articles,
        }
    }
}
