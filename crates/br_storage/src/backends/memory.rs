use async_trait::async_trait;
use br_core::{Article, ArticleStorage, ArticleUpdate, Error, NewArticle, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

pub struct MemoryStore {
    articles: Vec<Article>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn find_by_source_url(&self, source_url: &str) -> Option<Article> {
        self.articles.iter().find(|a| a.source_url == source_url).cloned()
    }

    pub fn create_article(&mut self, article: &NewArticle) -> Article {
        let now = Utc::now();
        let stored = Article {
            id: self.next_id,
            title: article.title.clone(),
            original_content: article.original_content.clone(),
            updated_content: None,
            source_url: article.source_url.clone(),
            references: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.next_id += 1;
        self.articles.push(stored.clone());
        stored
    }

    pub fn pending_refresh(&self) -> Vec<Article> {
        self.articles.iter().filter(|a| !a.is_refreshed()).cloned().collect()
    }

    pub fn apply_update(&mut self, id: i64, update: &ArticleUpdate) -> Result<()> {
        let article = self
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::Storage(format!("Article {} not found", id)))?;

        if article.is_refreshed() {
            return Err(Error::Storage(format!("Article {} was already refreshed", id)));
        }

        article.updated_content = Some(update.updated_content.clone());
        article.references = update.references.clone();
        article.updated_at = Utc::now();
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-local storage. Records vanish when the process exits.
#[derive(Clone)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn connect(_url: Option<&str>) -> Result<Self> where Self: Sized {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn find_by_source_url(&self, source_url: &str) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.find_by_source_url(source_url))
    }

    async fn create_article(&self, article: &NewArticle) -> Result<Article> {
        let mut store = self.store.write().await;
        Ok(store.create_article(article))
    }

    async fn pending_refresh(&self) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.pending_refresh())
    }

    async fn apply_update(&self, id: i64, update: &ArticleUpdate) -> Result<()> {
        let mut store = self.store.write().await;
        store.apply_update(id, update)
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.articles.clone())
    }

    async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.articles.iter().find(|a| a.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_article(url: &str) -> NewArticle {
        NewArticle {
            title: "Test Article".to_string(),
            original_content: "Test content".to_string(),
            source_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = InMemoryStorage::new();
        let first = storage.create_article(&new_article("https://example.com/a")).await.unwrap();
        let second = storage.create_article(&new_article("https://example.com/b")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let found = storage.find_by_source_url("https://example.com/b").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(2));
        assert!(storage.find_by_source_url("https://example.com/c").await.unwrap().is_none());

        let all = storage.list_articles().await.unwrap();
        assert_eq!(all.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_refreshed_articles_leave_pending_set() {
        let storage = InMemoryStorage::new();
        let article = storage.create_article(&new_article("https://example.com/a")).await.unwrap();
        storage.create_article(&new_article("https://example.com/b")).await.unwrap();
        assert_eq!(storage.pending_refresh().await.unwrap().len(), 2);

        let update = ArticleUpdate::with_references("Body", vec!["https://ref.com".to_string()]);
        storage.apply_update(article.id, &update).await.unwrap();

        let pending = storage.pending_refresh().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].source_url, "https://example.com/b");

        let refreshed = storage.get_article(article.id).await.unwrap().unwrap();
        assert_eq!(refreshed.references, vec!["https://ref.com".to_string()]);
        assert!(refreshed.is_refreshed());
    }

    #[tokio::test]
    async fn test_second_update_is_rejected() {
        let storage = InMemoryStorage::new();
        let article = storage.create_article(&new_article("https://example.com/a")).await.unwrap();
        let update = ArticleUpdate::with_references("Body", vec![]);
        storage.apply_update(article.id, &update).await.unwrap();

        let again = ArticleUpdate::with_references("Other", vec![]);
        assert!(storage.apply_update(article.id, &again).await.is_err());
        let stored = storage.get_article(article.id).await.unwrap().unwrap();
        assert_eq!(stored.updated_content, Some(update.updated_content));

        assert!(storage.apply_update(99, &again).await.is_err());
    }
}
