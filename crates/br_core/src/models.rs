use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::types::ReferenceArticle;
use crate::Result;

#[async_trait]
pub trait RewriteModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Rewrite an article body using the given reference pages.
    /// An empty string means the model produced nothing usable.
    async fn rewrite_article(&self, original: &str, references: &[ReferenceArticle]) -> Result<String>;
}

/// One organic result returned by a search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub link: String,
    #[serde(default)]
    pub title: String,
}

#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Ranked organic results for a query
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page body as text
    async fn fetch(&self, url: &str) -> Result<String>;
}
