use async_trait::async_trait;
use br_core::{ArticleLink, Error, Result};
use scraper::Selector;
use url::Url;

pub mod blog;
pub mod content;
pub mod listing;
pub mod search;

pub use blog::BlogScraper;

pub const DEFAULT_BASE_URL: &str = "https://beyondchats.com/blogs/";
pub const DEFAULT_LINK_MARKER: &str = "beyondchats.com/blogs/";
pub const DEFAULT_LAST_PAGE: u32 = 15;

/// Where the listing lives and how to recognise its article links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub base_url: String,
    /// Substring every article URL on the site contains
    pub link_marker: String,
    /// Page count assumed when pagination can't be read
    pub default_last_page: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            link_marker: DEFAULT_LINK_MARKER.to_string(),
            default_last_page: DEFAULT_LAST_PAGE,
        }
    }
}

impl SiteConfig {
    /// Builds a config for another listing; the marker is the URL minus its scheme.
    pub fn for_base_url(base_url: &str) -> Result<Self> {
        let parsed = utils::parse_url(base_url)?;
        let mut base_url = parsed.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let link_marker = base_url
            .split_once("://")
            .map(|(_, rest)| rest.trim_start_matches("www.").to_string())
            .unwrap_or_else(|| base_url.clone());

        Ok(Self {
            base_url,
            link_marker,
            default_last_page: DEFAULT_LAST_PAGE,
        })
    }
}

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Returns the name of the blog source
    fn source(&self) -> &str;

    /// URL of a listing page; page 1 is the listing root
    fn page_url(&self, page: u32) -> String;

    /// Highest listing page, or the configured default when it can't be determined
    async fn last_page_number(&self) -> u32;

    /// Heading links on a listing page; empty when the page can't be fetched
    async fn get_article_links(&self, page_url: &str) -> Vec<ArticleLink>;

    /// Body text of an article; `None` when fetching or extraction fails
    async fn scrape_article(&self, url: &str) -> Option<String>;
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use super::*;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))
    }

    pub fn parse_selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector)
            .map_err(|e| Error::Scraping(format!("Invalid selector {}: {:?}", selector, e)))
    }
}
