use std::sync::Arc;
use async_trait::async_trait;
use br_core::{ArticleLink, PageFetcher, Result};
use tracing::{error, warn};
use url::Url;
use super::content::{scrape_content, ARTICLE_PROFILE};
use super::listing::{page_url, parse_article_links, parse_last_page};
use super::{utils, Scraper, SiteConfig};

/// Scraper for a paginated blog listing with `h2` article headings.
#[derive(Clone)]
pub struct BlogScraper {
    site: SiteConfig,
    base_url: Url,
    fetcher: Arc<dyn PageFetcher>,
}

impl BlogScraper {
    pub fn new(site: SiteConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let base_url = utils::parse_url(&site.base_url)?;
        Ok(Self {
            site,
            base_url,
            fetcher,
        })
    }
}

#[async_trait]
impl Scraper for BlogScraper {
    fn source(&self) -> &str {
        self.base_url.host_str().unwrap_or("blog")
    }

    fn page_url(&self, page: u32) -> String {
        page_url(&self.site.base_url, page)
    }

    async fn last_page_number(&self) -> u32 {
        let html = match self.fetcher.fetch(&self.site.base_url).await {
            Ok(html) => html,
            Err(e) => {
                error!("Error finding last page: {}", e);
                return self.site.default_last_page;
            }
        };

        parse_last_page(&html, &self.base_url).unwrap_or_else(|| {
            warn!(
                "No pagination links found, assuming {} pages",
                self.site.default_last_page
            );
            self.site.default_last_page
        })
    }

    async fn get_article_links(&self, page_url: &str) -> Vec<ArticleLink> {
        let page = match utils::parse_url(page_url) {
            Ok(page) => page,
            Err(e) => {
                error!("Error fetching page {}: {}", page_url, e);
                return Vec::new();
            }
        };

        match self.fetcher.fetch(page_url).await {
            Ok(html) => parse_article_links(&html, &page, &self.site.link_marker),
            Err(e) => {
                error!("Error fetching page {}: {}", page_url, e);
                Vec::new()
            }
        }
    }

    async fn scrape_article(&self, url: &str) -> Option<String> {
        scrape_content(self.fetcher.as_ref(), url, &ARTICLE_PROFILE).await
    }
}
