use std::sync::Arc;
use std::time::Duration;
use clap::Args;
use br_core::{ArticleStorage, Result};
use crate::fetcher::HttpFetcher;
use crate::manager::{DiscoveryReport, ScraperManager};
use crate::refresh::{RefreshManager, RefreshReport};
use crate::scrapers::listing::OLDEST_LIMIT;
use crate::scrapers::search::{ReferenceSearch, SearchConfig, SerperSearcher};
use crate::scrapers::{BlogScraper, SiteConfig, DEFAULT_BASE_URL, DEFAULT_LAST_PAGE};
use crate::throttle::Delays;

/// Minimum spacing between outbound requests, in milliseconds.
#[derive(Args, Debug, Clone)]
pub struct DelayArgs {
    #[arg(long, default_value_t = 500)]
    pub page_delay_ms: u64,
    #[arg(long, default_value_t = 1000)]
    pub article_delay_ms: u64,
    #[arg(long, default_value_t = 1000)]
    pub reference_delay_ms: u64,
    #[arg(long, default_value_t = 2000)]
    pub record_delay_ms: u64,
}

impl From<&DelayArgs> for Delays {
    fn from(args: &DelayArgs) -> Self {
        Self {
            page: Duration::from_millis(args.page_delay_ms),
            article: Duration::from_millis(args.article_delay_ms),
            reference: Duration::from_millis(args.reference_delay_ms),
            record: Duration::from_millis(args.record_delay_ms),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    /// Blog listing root
    #[arg(long, env = "BLOG_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    /// How many of the oldest articles to collect
    #[arg(long, default_value_t = OLDEST_LIMIT)]
    pub limit: usize,
    /// Page count assumed when pagination can't be read
    #[arg(long, default_value_t = DEFAULT_LAST_PAGE)]
    pub default_last_page: u32,
    #[command(flatten)]
    pub delays: DelayArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RefreshArgs {
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    pub serper_api_key: Option<String>,
    /// Rewrite model: groq (default) or dummy
    #[arg(long, env = "LLM_PROVIDER", default_value = "groq")]
    pub model: String,
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,
    #[arg(long, env = "LLM_MODEL_ID", default_value = br_inference::DEFAULT_MODEL_ID)]
    pub model_id: String,
    /// OpenAI-compatible base URL
    #[arg(long, env = "LLM_BASE_URL", default_value = br_inference::DEFAULT_BASE_URL)]
    pub model_url: String,
    #[command(flatten)]
    pub delays: DelayArgs,
}

impl RefreshArgs {
    pub fn inference_config(&self) -> br_inference::Config {
        br_inference::Config {
            api_key: self.groq_api_key.clone(),
            model_name: Some(self.model.clone()),
            model_id: self.model_id.clone(),
            base_url: self.model_url.clone(),
            ..br_inference::Config::default()
        }
    }
}

pub async fn run_discovery(args: &DiscoverArgs, storage: Arc<dyn ArticleStorage>) -> Result<DiscoveryReport> {
    let mut site = SiteConfig::for_base_url(&args.base_url)?;
    site.default_last_page = args.default_last_page;

    let scraper = BlogScraper::new(site, Arc::new(HttpFetcher::new()?))?;
    let manager = ScraperManager::new(storage, Arc::new(scraper))
        .with_delays(Delays::from(&args.delays))
        .with_limit(args.limit);
    Ok(manager.discover().await)
}

/// Missing API keys fail here, before any record is touched.
pub async fn run_refresh(args: &RefreshArgs, storage: Arc<dyn ArticleStorage>) -> Result<RefreshReport> {
    let searcher = SerperSearcher::new(args.serper_api_key.as_deref().unwrap_or_default())?;
    let model = br_inference::create_model(Some(args.inference_config()))?;
    tracing::info!("🧠 Rewrite model ready (using {})", model.name());

    let references = ReferenceSearch::new(Arc::new(searcher), SearchConfig::default());
    let manager = RefreshManager::new(storage, references, Arc::new(HttpFetcher::browser_like()?), model)
        .with_delays(Delays::from(&args.delays));
    manager.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use br_storage::InMemoryStorage;
    use clap::Parser;

    #[derive(Parser)]
    struct Discover {
        #[command(flatten)]
        args: DiscoverArgs,
    }

    #[derive(Parser)]
    struct Refresh {
        #[command(flatten)]
        args: RefreshArgs,
    }

    #[test]
    fn test_discover_defaults() {
        let args = Discover::parse_from(["discover", "--base-url", "https://example.com/blog/"]).args;
        assert_eq!(args.base_url, "https://example.com/blog/");
        assert_eq!(args.limit, 5);
        assert_eq!(args.default_last_page, 15);
        assert_eq!(Delays::from(&args.delays), Delays::default());
    }

    #[test]
    fn test_delay_flags() {
        let args = Discover::parse_from(["discover", "--page-delay-ms", "0", "--record-delay-ms", "250"]).args;
        let delays = Delays::from(&args.delays);
        assert_eq!(delays.page, Duration::ZERO);
        assert_eq!(delays.record, Duration::from_millis(250));
    }

    #[test]
    fn test_inference_config_from_flags() {
        let args = Refresh::parse_from([
            "refresh",
            "--model",
            "dummy",
            "--groq-api-key",
            "k",
            "--model-id",
            "llama-3.1-8b-instant",
        ])
        .args;
        let config = args.inference_config();
        assert_eq!(config.model_name.as_deref(), Some("dummy"));
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.model_id, "llama-3.1-8b-instant");
        assert_eq!(config.max_tokens, 4000);
    }

    #[tokio::test]
    async fn test_refresh_without_search_key_is_fatal() {
        let args = Refresh::parse_from(["refresh", "--model", "dummy", "--serper-api-key", ""]).args;
        let storage = Arc::new(InMemoryStorage::new());
        assert!(run_refresh(&args, storage).await.is_err());
    }

    #[tokio::test]
    async fn test_discovery_rejects_bad_base_url() {
        let args = Discover::parse_from(["discover", "--base-url", "not a url"]).args;
        assert!(run_discovery(&args, Arc::new(InMemoryStorage::new())).await.is_err());
    }
}
