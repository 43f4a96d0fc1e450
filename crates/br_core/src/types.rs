use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored blog post, as discovered and (possibly) refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub original_content: String,
    #[serde(default)]
    pub updated_content: Option<String>,
    pub source_url: String,
    #[serde(default)]
    pub references: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// True once the refresh job has written rewritten content.
    pub fn is_refreshed(&self) -> bool {
        self.updated_content
            .as_deref()
            .map_or(false, |content| !content.is_empty())
    }
}

/// Fields the discovery job supplies when creating a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub original_content: String,
    pub source_url: String,
}

/// The single write the refresh job performs on a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    pub updated_content: String,
    pub references: Vec<String>,
}

impl ArticleUpdate {
    /// Appends a numbered references block to the rewritten body.
    pub fn with_references(rewritten: &str, references: Vec<String>) -> Self {
        let listing = references
            .iter()
            .enumerate()
            .map(|(i, url)| format!("{}. {}", i + 1, url))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            updated_content: format!("{}\n\n---\n\n**References:**\n{}", rewritten, listing),
            references,
        }
    }
}

/// A heading link found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleLink {
    pub title: String,
    pub url: String,
}

/// Scraped text of an external page used as rewrite input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceArticle {
    pub url: String,
    pub content: String,
}

/// Outcome of one discovered link.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleStatus {
    Saved,
    AlreadyStored,
    NoContent,
    Failed(String),
}

impl ArticleStatus {
    pub fn emoji(&self) -> &'static str {
        match self {
            ArticleStatus::Saved => "🆕",
            ArticleStatus::AlreadyStored => "⏭️",
            ArticleStatus::NoContent => "⚠️",
            ArticleStatus::Failed(_) => "❌",
        }
    }
}
