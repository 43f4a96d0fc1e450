pub mod cli;
pub mod fetcher;
pub mod logging;
pub mod manager;
pub mod refresh;
pub mod scrapers;
pub mod throttle;

#[cfg(test)]
mod test_utils;

pub use manager::{DiscoveryReport, ScraperManager};
pub use refresh::{RefreshManager, RefreshOutcome, RefreshReport, RefreshState, SkipReason};
pub use scrapers::{BlogScraper, Scraper, SiteConfig};
pub use throttle::{Delays, Throttle};

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use br_core::{Article, ArticleLink, Error, Result};
}
