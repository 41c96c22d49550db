//! Signal scorer: one [`Article`] in, one [`ScoredArticle`] out.
//!
//! net = positive × (2.0 if credible else 1.0) − negative × 1.5
//!
//! The credibility boost applies to the positive term only. Negative
//! patterns are hedging/wrong-event language and weigh the same whatever the
//! publisher.

use serde::{Deserialize, Serialize};

use super::rules::SignalRules;
use crate::ingest::types::Article;

pub const CREDIBLE_MULTIPLIER: f32 = 2.0;
pub const NEGATIVE_WEIGHT: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    pub positive_score: u32,
    pub negative_score: u32,
    pub is_credible: bool,
    pub net_score: f32,
}

impl ScoredArticle {
    /// Build from already-known scores; net score is derived.
    pub fn from_scores(
        article: Article,
        positive_score: u32,
        negative_score: u32,
        is_credible: bool,
    ) -> Self {
        Self {
            article,
            positive_score,
            negative_score,
            is_credible,
            net_score: net_score(positive_score, negative_score, is_credible),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.net_score > 0.0
    }

    pub fn source(&self) -> &str {
        &self.article.source
    }
}

pub fn net_score(positive: u32, negative: u32, is_credible: bool) -> f32 {
    let boost = if is_credible { CREDIBLE_MULTIPLIER } else { 1.0 };
    positive as f32 * boost - negative as f32 * NEGATIVE_WEIGHT
}

/// Case-folded "title description" text the patterns run against.
pub fn search_text(article: &Article) -> String {
    format!("{} {}", article.title, article.description).to_lowercase()
}

pub fn score_article(article: &Article, rules: &SignalRules) -> ScoredArticle {
    let text = search_text(article);
    ScoredArticle::from_scores(
        article.clone(),
        rules.positive_hits(&text),
        rules.negative_hits(&text),
        rules.is_credible(&article.source),
    )
}

pub fn score_all(articles: &[Article], rules: &SignalRules) -> Vec<ScoredArticle> {
    articles.iter().map(|a| score_article(a, rules)).collect()
}

/// Stable sort by net score, highest first; ties keep input order.
pub fn rank(mut scored: Vec<ScoredArticle>) -> Vec<ScoredArticle> {
    scored.sort_by(|a, b| b.net_score.total_cmp(&a.net_score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(title: &str, source: &str) -> Article {
        Article::new(title, format!("https://x/{title}"), source, "")
    }

    #[test]
    fn credibility_boosts_positive_term_only() {
        assert_eq!(net_score(2, 0, true), 4.0);
        assert_eq!(net_score(2, 0, false), 2.0);
        assert_eq!(net_score(1, 1, true), 0.5);
        assert_eq!(net_score(1, 1, false), -0.5);
        assert_eq!(net_score(0, 2, true), -3.0);
    }

    #[test]
    fn zero_matches_is_not_a_hit() {
        let rules = SignalRules::builtin().unwrap();
        let s = score_article(&art("Markets close higher on Friday", "reuters"), &rules);
        assert_eq!((s.positive_score, s.negative_score), (0, 0));
        assert_eq!(s.net_score, 0.0);
        assert!(s.is_credible);
        assert!(!s.is_hit());
    }

    #[test]
    fn description_is_part_of_search_text() {
        let rules = SignalRules::builtin().unwrap();
        let a = art("Breaking news", "local herald")
            .with_description("Officials say US bombed Iran overnight.");
        let s = score_article(&a, &rules);
        assert_eq!(s.positive_score, 1);
        assert_eq!(s.net_score, 1.0);
    }

    #[test]
    fn rank_is_descending_and_stable() {
        let mk = |t: &str, net_pos: u32| ScoredArticle::from_scores(art(t, "x"), net_pos, 0, false);
        let ranked = rank(vec![mk("a", 1), mk("b", 3), mk("c", 1), mk("d", 0), mk("e", 3)]);
        let order: Vec<&str> = ranked.iter().map(|s| s.article.title.as_str()).collect();
        assert_eq!(order, vec!["b", "e", "a", "c", "d"]);
    }

    #[test]
    fn serializes_flat() {
        let s = ScoredArticle::from_scores(art("t", "reuters"), 1, 0, true);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["title"], serde_json::json!("t"));
        assert_eq!(v["source"], serde_json::json!("reuters"));
        assert_eq!(v["net_score"], serde_json::json!(2.0));
        assert_eq!(v["is_credible"], serde_json::json!(true));
    }
}
