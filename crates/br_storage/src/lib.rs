use async_trait::async_trait;
use br_core::{ArticleStorage, Error, Result};
use std::sync::Arc;

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn get_error_message() -> &'static str;

    /// Open the backend. `url` is backend specific; `None` picks the default location.
    async fn connect(url: Option<&str>) -> Result<Self> where Self: Sized;
}

/// Opens the named backend. Connection failures propagate: callers treat them as fatal.
pub async fn create_storage(kind: &str, url: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        "memory" => {
            let storage = InMemoryStorage::connect(url).await?;
            Ok(Arc::new(storage))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let storage = SQLiteStorage::connect(url).await.map_err(|e| {
                Error::Database(format!("{} ({})", e, SQLiteStorage::get_error_message()))
            })?;
            tracing::info!("💾 Using SQLite database at {}", storage.get_db_path().display());
            Ok(Arc::new(storage))
        }
        other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::StorageBackend;
    pub use super::backends::*;
}
