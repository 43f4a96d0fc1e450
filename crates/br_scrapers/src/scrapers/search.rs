//! Reference discovery through a web search provider.

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use br_core::{Error, Result, SearchHit, WebSearcher};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// The source site itself plus platforms whose pages make poor references.
pub const DENIED_DOMAINS: &[&str] = &[
    "beyondchats.com",
    "youtube.com",
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "reddit.com",
    "quora.com",
    "pinterest.com",
    "instagram.com",
    "amazon.com",
    "wikipedia.org",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Organic results requested from the provider
    pub max_results: usize,
    /// References kept after filtering
    pub keep: usize,
    pub query_suffix: String,
    pub denied_domains: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            keep: 2,
            query_suffix: " blog article".to_string(),
            denied_domains: DENIED_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
}

/// Google results through serper.dev.
pub struct SerperSearcher {
    api_key: String,
    endpoint: String,
    client: Client,
}

impl SerperSearcher {
    pub fn new(api_key: &str) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("Serper API key is required".to_string()));
        }
        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: SERPER_ENDPOINT.to_string(),
            client: Client::builder().timeout(SEARCH_TIMEOUT).build()?,
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[async_trait]
impl WebSearcher for SerperSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let body = serde_json::json!({
            "q": query,
            "num": max_results,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!("Serper returned {}: {}", status, message)));
        }

        let data: SerperResponse = response.json().await?;
        Ok(data
            .organic
            .into_iter()
            .map(|r| SearchHit {
                link: r.link,
                title: r.title,
            })
            .collect())
    }
}

fn is_denied(link: &str, denied_domains: &[String]) -> bool {
    match Url::parse(link).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
        Some(host) => denied_domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d))),
        None => denied_domains.iter().any(|d| link.contains(d.as_str())),
    }
}

/// First `keep` links, in rank order, that are present and not deny-listed.
pub fn filter_references(hits: &[SearchHit], denied_domains: &[String], keep: usize) -> Vec<String> {
    hits.iter()
        .map(|hit| hit.link.trim())
        .filter(|link| !link.is_empty() && !is_denied(link, denied_domains))
        .take(keep)
        .map(str::to_string)
        .collect()
}

/// Search plus deny-list filtering. Provider failures become an empty list.
#[derive(Clone)]
pub struct ReferenceSearch {
    searcher: Arc<dyn WebSearcher>,
    config: SearchConfig,
}

impl ReferenceSearch {
    pub fn new(searcher: Arc<dyn WebSearcher>, config: SearchConfig) -> Self {
        Self { searcher, config }
    }

    pub async fn find_references(&self, title: &str) -> Vec<String> {
        let query = format!("{}{}", title, self.config.query_suffix);
        let hits = match self.searcher.search(&query, self.config.max_results).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Search API error: {}", e);
                return Vec::new();
            }
        };

        let links = filter_references(&hits, &self.config.denied_domains, self.config.keep);
        info!("Search found {} results, using {}", hits.len(), links.len());
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{hit, StaticSearcher};

    fn denied() -> Vec<String> {
        SearchConfig::default().denied_domains
    }

    #[test]
    fn test_filter_keeps_first_two_allowed() {
        let hits = vec![
            hit("https://www.youtube.com/watch?v=1"),
            hit("https://blog.one.com/post"),
            hit(""),
            hit("https://en.wikipedia.org/wiki/Chatbot"),
            hit("https://two.io/article"),
            hit("https://three.net/x"),
        ];
        assert_eq!(
            filter_references(&hits, &denied(), 2),
            vec!["https://blog.one.com/post".to_string(), "https://two.io/article".to_string()]
        );
    }

    #[test]
    fn test_filter_only_denied_is_empty() {
        let hits = vec![
            hit("https://beyondchats.com/blogs/own-post/"),
            hit("https://www.reddit.com/r/chatbots"),
            hit("https://www.amazon.com/dp/123"),
            hit("https://www.linkedin.com/pulse/x"),
        ];
        assert!(filter_references(&hits, &denied(), 2).is_empty());
    }

    #[test]
    fn test_denied_matches_hosts_not_lookalikes() {
        assert!(is_denied("https://m.facebook.com/page", &denied()));
        assert!(!is_denied("https://notyoutube.company.com/x", &denied()));
        assert!(is_denied("not a url but quora.com", &denied()));
    }

    #[tokio::test]
    async fn test_find_references_appends_suffix() {
        let searcher = Arc::new(StaticSearcher::new(vec![hit("https://ok.com/a")]));
        let search = ReferenceSearch::new(searcher.clone(), SearchConfig::default());

        let links = search.find_references("Chatbots in 2024").await;
        assert_eq!(links, vec!["https://ok.com/a".to_string()]);
        assert_eq!(
            searcher.queries(),
            vec![("Chatbots in 2024 blog article".to_string(), 10)]
        );
    }

    #[tokio::test]
    async fn test_find_references_swallows_errors() {
        let search = ReferenceSearch::new(Arc::new(StaticSearcher::failing()), SearchConfig::default());
        assert!(search.find_references("Anything").await.is_empty());
    }

    #[test]
    fn test_serper_requires_key() {
        assert!(SerperSearcher::new("").is_err());
        assert!(SerperSearcher::new("key").is_ok());
    }

    #[test]
    fn test_serper_response_parsing() {
        let data: SerperResponse = serde_json::from_str(
            r#"{"searchParameters":{"q":"x"},"organic":[{"title":"T","link":"https://a.com","position":1},{"snippet":"no link"}]}"#,
        )
        .unwrap();
        assert_eq!(data.organic.len(), 2);
        assert_eq!(data.organic[0].link, "https://a.com");
        assert_eq!(data.organic[1].link, "");

        let empty: SerperResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.organic.is_empty());
    }
}
