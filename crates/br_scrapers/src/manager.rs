use std::sync::Arc;
use br_core::{ArticleLink, ArticleStatus, ArticleStorage, NewArticle, Result};
use crate::logging::Logger;
use crate::scrapers::listing::{LinkAccumulator, OLDEST_LIMIT};
use crate::scrapers::Scraper;
use crate::throttle::{Delays, Throttle};

/// Per-link outcomes of one discovery run.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub last_page: u32,
    pub results: Vec<(ArticleLink, ArticleStatus)>,
}

impl DiscoveryReport {
    pub fn count(&self, status: &ArticleStatus) -> usize {
        self.results
            .iter()
            .filter(|(_, s)| std::mem::discriminant(s) == std::mem::discriminant(status))
            .count()
    }

    pub fn saved(&self) -> usize {
        self.count(&ArticleStatus::Saved)
    }
}

/// Runs the discovery job: oldest listing links in, new records out.
pub struct ScraperManager {
    storage: Arc<dyn ArticleStorage>,
    scraper: Arc<dyn Scraper>,
    delays: Delays,
    limit: usize,
}

impl ScraperManager {
    pub fn new(storage: Arc<dyn ArticleStorage>, scraper: Arc<dyn Scraper>) -> Self {
        Self {
            storage,
            scraper,
            delays: Delays::default(),
            limit: OLDEST_LIMIT,
        }
    }

    pub fn with_delays(mut self, delays: Delays) -> Self {
        self.delays = delays;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Walks from `last_page` down to 1 folding links until `limit` unique ones are held.
    /// `site` spaces every listing fetch by the page delay.
    pub async fn collect_oldest_links(&self, last_page: u32, site: &mut Throttle) -> Vec<ArticleLink> {
        let mut acc = LinkAccumulator::new(self.limit);

        for page in (1..=last_page).rev() {
            if acc.is_full() {
                break;
            }
            site.wait().await;
            tracing::info!("📄 Fetching articles from page {}...", page);
            let links = self.scraper.get_article_links(&self.scraper.page_url(page)).await;
            site.mark();
            acc = acc.absorb(links);
        }

        acc.finish()
    }

    async fn store_link(&self, link: &ArticleLink, logger: &Logger) -> Result<ArticleStatus> {
        if self.storage.find_by_source_url(&link.url).await?.is_some() {
            logger.info(&format!("Already exists: {}", link.title));
            return Ok(ArticleStatus::AlreadyStored);
        }

        logger.info(&format!("Scraping: {}", link.title));
        let Some(content) = self.scraper.scrape_article(&link.url).await else {
            logger.warn("No content found, skipping...");
            return Ok(ArticleStatus::NoContent);
        };

        self.storage
            .create_article(&NewArticle {
                title: link.title.clone(),
                original_content: content,
                source_url: link.url.clone(),
            })
            .await?;
        logger.info("✓ Saved to database");
        Ok(ArticleStatus::Saved)
    }

    pub async fn discover(&self) -> DiscoveryReport {
        tracing::info!("🦗 Scraping started for {}", self.scraper.source());

        // one gate for every request to the source site, across both phases
        let mut site = Throttle::new(self.delays.page);

        let last_page = self.scraper.last_page_number().await;
        site.mark();
        tracing::info!("Last page found: {}", last_page);

        let links = self.collect_oldest_links(last_page, &mut site).await;
        tracing::info!("Found {} oldest articles to scrape", links.len());

        let mut results = Vec::with_capacity(links.len());
        let total = links.len();

        for (i, link) in links.into_iter().enumerate() {
            let logger = Logger::new().with_prefix(format!("[{}/{}]", i + 1, total));
            site.wait().await;

            let status = match self.store_link(&link, &logger).await {
                Ok(status) => status,
                Err(e) => {
                    logger.error(&format!("Error processing {}: {}", link.title, e));
                    ArticleStatus::Failed(e.to_string())
                }
            };
            match status {
                ArticleStatus::Saved => site.mark_for(self.delays.article),
                ArticleStatus::AlreadyStored => {}
                _ => site.mark(),
            }
            logger.debug(&format!("{} {}", status.emoji(), link.url));
            results.push((link, status));
        }

        let report = DiscoveryReport { last_page, results };
        tracing::info!(
            "✅ Scraping completed: {} saved, {} already stored, {} without content, {} failed",
            report.saved(),
            report.count(&ArticleStatus::AlreadyStored),
            report.count(&ArticleStatus::NoContent),
            report.count(&ArticleStatus::Failed(String::new())),
        );
        report
    }
}
