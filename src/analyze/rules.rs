//! Compiled signal rule set.
//!
//! Built once from [`MonitorConfig`] and shared read-only (`Arc<SignalRules>`)
//! for the lifetime of the process. Pattern order is preserved from the
//! config file; each pattern is counted at most once per article.

use anyhow::{anyhow, Result};
use regex::Regex;

use crate::config::MonitorConfig;

#[derive(Debug)]
pub struct SignalPattern {
    re: Regex,
}

impl SignalPattern {
    fn compile(section: &str, idx: usize, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| anyhow!("{section} pattern #{idx} `{pattern}` regex error: {e}"))?;
        Ok(Self { re })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

#[derive(Debug)]
pub struct SignalRules {
    positive: Vec<SignalPattern>,
    negative: Vec<SignalPattern>,
    credible_sources: Vec<String>,
    ignored_sources: Vec<String>,
}

impl SignalRules {
    pub fn compile(cfg: &MonitorConfig) -> Result<Self> {
        Self::from_parts(
            &cfg.signals.positive,
            &cfg.signals.negative,
            &cfg.sources.credible,
            &cfg.sources.ignored,
        )
    }

    pub fn from_parts(
        positive: &[String],
        negative: &[String],
        credible: &[String],
        ignored: &[String],
    ) -> Result<Self> {
        let positive = positive
            .iter()
            .enumerate()
            .map(|(i, p)| SignalPattern::compile("positive", i, p))
            .collect::<Result<Vec<_>>>()?;
        let negative = negative
            .iter()
            .enumerate()
            .map(|(i, p)| SignalPattern::compile("negative", i, p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            positive,
            negative,
            credible_sources: credible.iter().map(|s| s.to_lowercase()).collect(),
            ignored_sources: ignored.iter().map(|s| s.to_lowercase()).collect(),
        })
    }

    /// Compile the rule set shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::compile(&MonitorConfig::builtin()?)
    }

    /// Number of positive patterns matching `text` (already case-folded).
    pub fn positive_hits(&self, text: &str) -> u32 {
        count_matching(&self.positive, text)
    }

    pub fn negative_hits(&self, text: &str) -> u32 {
        count_matching(&self.negative, text)
    }

    pub fn is_credible(&self, source: &str) -> bool {
        let s = source.to_lowercase();
        self.credible_sources.iter().any(|cs| s.contains(cs.as_str()))
    }

    pub fn ignored_sources(&self) -> &[String] {
        &self.ignored_sources
    }
}

fn count_matching(set: &[SignalPattern], text: &str) -> u32 {
    set.iter().filter(|p| p.is_match(text)).count() as u32
}
