pub mod error;
pub mod models;
pub mod storage;
pub mod text;
pub mod types;

pub use error::Error;
pub use models::{PageFetcher, RewriteModel, SearchHit, WebSearcher};
pub use storage::ArticleStorage;
pub use types::{Article, ArticleLink, ArticleStatus, ArticleUpdate, NewArticle, ReferenceArticle};

pub type Result<T> = std::result::Result<T, Error>;
