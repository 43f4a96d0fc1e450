use async_trait::async_trait;
use crate::types::{Article, ArticleUpdate, NewArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Look up the record for a source URL, if one was stored
    async fn find_by_source_url(&self, source_url: &str) -> Result<Option<Article>>;

    /// Insert a new record; timestamps and id are assigned by the store
    async fn create_article(&self, article: &NewArticle) -> Result<Article>;

    /// Records whose updated content is absent or empty, in insertion order
    async fn pending_refresh(&self) -> Result<Vec<Article>>;

    /// Write updated content and references together.
    /// Fails if the record does not exist or was already refreshed.
    async fn apply_update(&self, id: i64, update: &ArticleUpdate) -> Result<()>;

    /// All records in insertion order
    async fn list_articles(&self) -> Result<Vec<Article>>;

    async fn get_article(&self, id: i64) -> Result<Option<Article>>;
}
