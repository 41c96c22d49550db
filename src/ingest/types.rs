// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Entry as handed over by a source adapter, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub published: Option<String>,
}

/// Normalized news article shared by every stage of a check cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub link: String,     // dedup key within one cycle
    pub source: String,   // lower-cased publisher, e.g. "reuters"
    pub published: String, // source-native timestamp, parsed lazily
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
        published: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            link: link.into(),
            source: source.into().to_lowercase(),
            published: published.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A searchable news source. Called once per query; failures are reported
/// per call and never abort the cycle.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<RawEntry>>;
    fn name(&self) -> &'static str;
}
