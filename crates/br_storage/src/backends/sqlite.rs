use async_trait::async_trait;
use br_core::{Article, ArticleStorage, ArticleUpdate, Error, NewArticle, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use crate::StorageBackend;

const DEFAULT_DB_PATH: &str = "articles.db";

// source_url is indexed, not UNIQUE; duplicates are suppressed before insert.
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        original_content TEXT NOT NULL,
        updated_content TEXT,
        source_url TEXT NOT NULL,
        reference_urls TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_articles_source_url ON articles (source_url)
    "#,
];

const SELECT_COLUMNS: &str =
    "id, title, original_content, updated_content, source_url, reference_urls, created_at, updated_at";

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database path must be writable (default ./articles.db)"
    }

    async fn connect(url: Option<&str>) -> Result<Self> {
        let path = url
            .map(|u| u.trim_start_matches("sqlite://").trim_start_matches("sqlite:"))
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_DB_PATH);
        Self::new_with_path(Path::new(path)).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &PathBuf {
        &self.db_path
    }

    async fn fetch_where(&self, clause: &str) -> Result<Vec<Article>> {
        let sql = format!("SELECT {} FROM articles {} ORDER BY id ASC", SELECT_COLUMNS, clause);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to load articles: {}", e)))?;

        rows.iter().map(row_to_article).collect()
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Database(format!("Failed to parse date: {}", e)))
}

fn row_to_article(row: &SqliteRow) -> Result<Article> {
    let references: String = row.get("reference_urls");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Article {
        id: row.get("id"),
        title: row.get("title"),
        original_content: row.get("original_content"),
        updated_content: row.get::<Option<String>, _>("updated_content"),
        source_url: row.get("source_url"),
        references: serde_json::from_str(&references)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn find_by_source_url(&self, source_url: &str) -> Result<Option<Article>> {
        let sql = format!("SELECT {} FROM articles WHERE source_url = ? LIMIT 1", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(source_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to look up {}: {}", source_url, e)))?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn create_article(&self, article: &NewArticle) -> Result<Article> {
        let now = Utc::now().to_rfc3339();
        let id = sqlx::query(
            r#"
            INSERT INTO articles
            (title, original_content, updated_content, source_url, reference_urls, created_at, updated_at)
            VALUES (?, ?, NULL, ?, '[]', ?, ?)
            "#,
        )
        .bind(&article.title)
        .bind(&article.original_content)
        .bind(&article.source_url)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to store article: {}", e)))?
        .last_insert_rowid();

        self.get_article(id)
            .await?
            .ok_or_else(|| Error::Storage(format!("Article {} missing after insert", id)))
    }

    async fn pending_refresh(&self) -> Result<Vec<Article>> {
        self.fetch_where("WHERE updated_content IS NULL OR updated_content = ''").await
    }

    async fn apply_update(&self, id: i64, update: &ArticleUpdate) -> Result<()> {
        let references = serde_json::to_string(&update.references)?;
        let result = sqlx::query(
            r#"
            UPDATE articles
            SET updated_content = ?, reference_urls = ?, updated_at = ?
            WHERE id = ? AND (updated_content IS NULL OR updated_content = '')
            "#,
        )
        .bind(&update.updated_content)
        .bind(references)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update article {}: {}", id, e)))?;

        if result.rows_affected() == 0 {
            return Err(Error::Storage(format!(
                "Article {} not found or already refreshed",
                id
            )));
        }
        Ok(())
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        self.fetch_where("").await
    }

    async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let sql = format!("SELECT {} FROM articles WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to load article {}: {}", id, e)))?;

        row.as_ref().map(row_to_article).transpose()
    }
}
