use std::fmt;
use std::sync::Arc;
use br_core::{Article, ArticleStorage, ArticleUpdate, PageFetcher, ReferenceArticle, Result, RewriteModel};
use crate::logging::Logger;
use crate::scrapers::content::{scrape_content, REFERENCE_PROFILE};
use crate::scrapers::search::ReferenceSearch;
use crate::throttle::{Delays, Throttle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoSearchResults,
    NoReferenceContent,
    EmptyRewrite,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::NoSearchResults => "no search results",
            SkipReason::NoReferenceContent => "no reference content",
            SkipReason::EmptyRewrite => "empty rewrite",
        };
        f.write_str(reason)
    }
}

/// Where a record is in its refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshState {
    Pending,
    Searching,
    ScrapingReferences,
    Rewriting,
    Saved,
    Skipped(SkipReason),
}

impl RefreshState {
    fn emoji(&self) -> &'static str {
        match self {
            RefreshState::Pending => "⏳",
            RefreshState::Searching => "🔎",
            RefreshState::ScrapingReferences => "📥",
            RefreshState::Rewriting => "🤖",
            RefreshState::Saved => "✅",
            RefreshState::Skipped(_) => "⏭️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Saved { references: Vec<String> },
    Skipped(SkipReason),
}

impl From<&RefreshOutcome> for RefreshState {
    fn from(outcome: &RefreshOutcome) -> Self {
        match outcome {
            RefreshOutcome::Saved { .. } => RefreshState::Saved,
            RefreshOutcome::Skipped(reason) => RefreshState::Skipped(*reason),
        }
    }
}

#[derive(Debug, Default)]
pub struct RefreshReport {
    pub outcomes: Vec<(i64, RefreshOutcome)>,
}

impl RefreshReport {
    pub fn saved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, RefreshOutcome::Saved { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.saved()
    }
}

/// Runs the refresh job over records that have no updated content yet.
pub struct RefreshManager {
    storage: Arc<dyn ArticleStorage>,
    references: ReferenceSearch,
    fetcher: Arc<dyn PageFetcher>,
    model: Arc<dyn RewriteModel>,
    delays: Delays,
}

impl RefreshManager {
    pub fn new(
        storage: Arc<dyn ArticleStorage>,
        references: ReferenceSearch,
        fetcher: Arc<dyn PageFetcher>,
        model: Arc<dyn RewriteModel>,
    ) -> Self {
        Self {
            storage,
            references,
            fetcher,
            model,
            delays: Delays::default(),
        }
    }

    pub fn with_delays(mut self, delays: Delays) -> Self {
        self.delays = delays;
        self
    }

    pub async fn run(&self) -> Result<RefreshReport> {
        let candidates = self.storage.pending_refresh().await?;
        if candidates.is_empty() {
            tracing::info!("No articles to update");
            return Ok(RefreshReport::default());
        }

        tracing::info!(
            "🔄 Refreshing {} articles with {}",
            candidates.len(),
            self.model.name()
        );

        // paces every outbound call of the job: reference scrapes, rewrites, the next record
        let mut pace = Throttle::new(self.delays.reference);
        let mut report = RefreshReport::default();
        let total = candidates.len();

        for (i, article) in candidates.iter().enumerate() {
            pace.wait().await;
            let logger = Logger::new().with_prefix(format!("[{}/{}]", i + 1, total));
            logger.info(&format!("Processing: {}", article.title));

            let outcome = self.process_article(article, &mut pace, &logger).await?;
            if let RefreshOutcome::Skipped(reason) = &outcome {
                logger.warn(&format!("Skipping: {}", reason));
            }
            report.outcomes.push((article.id, outcome));
        }

        tracing::info!(
            "✅ Refresh completed: {} saved, {} skipped",
            report.saved(),
            report.skipped()
        );
        Ok(report)
    }

    fn enter(&self, state: &mut RefreshState, next: RefreshState, logger: &Logger) {
        logger.debug(&format!("{} {:?} -> {:?}", next.emoji(), state, next));
        *state = next;
    }

    /// Drives one record from `Pending` to `Saved` or `Skipped`. Only a failed store write is an error.
    /// `pace` carries the reference and record delays across records.
    pub async fn process_article(
        &self,
        article: &Article,
        pace: &mut Throttle,
        logger: &Logger,
    ) -> Result<RefreshOutcome> {
        let mut state = RefreshState::Pending;

        self.enter(&mut state, RefreshState::Searching, logger);
        let urls = self.references.find_references(&article.title).await;
        if urls.is_empty() {
            return Ok(RefreshOutcome::Skipped(SkipReason::NoSearchResults));
        }
        logger.info(&format!("Found {} reference articles", urls.len()));

        self.enter(&mut state, RefreshState::ScrapingReferences, logger);
        let references = self.scrape_references(&urls, pace, logger).await;
        if references.is_empty() {
            return Ok(RefreshOutcome::Skipped(SkipReason::NoReferenceContent));
        }

        self.enter(&mut state, RefreshState::Rewriting, logger);
        pace.wait().await;
        let rewritten = match self.model.rewrite_article(&article.original_content, &references).await {
            Ok(text) => text,
            Err(e) => {
                logger.error(&format!("LLM API error: {}", e));
                String::new()
            }
        };
        if rewritten.trim().is_empty() {
            return Ok(RefreshOutcome::Skipped(SkipReason::EmptyRewrite));
        }

        let used: Vec<String> = references.into_iter().map(|r| r.url).collect();
        let update = ArticleUpdate::with_references(&rewritten, used.clone());
        self.storage.apply_update(article.id, &update).await?;
        pace.mark_for(self.delays.record);

        self.enter(&mut state, RefreshState::Saved, logger);
        logger.info("✓ Article updated successfully");
        Ok(RefreshOutcome::Saved { references: used })
    }

    async fn scrape_references(&self, urls: &[String], pace: &mut Throttle, logger: &Logger) -> Vec<ReferenceArticle> {
        let mut references = Vec::with_capacity(urls.len());

        for url in urls {
            pace.wait().await;
            logger.info(&format!("Scraping reference: {}", url));
            if let Some(content) = scrape_content(self.fetcher.as_ref(), url, &REFERENCE_PROFILE).await {
                references.push(ReferenceArticle {
                    url: url.clone(),
                    content,
                });
            }
            pace.mark();
        }
        references
    }
}
