//! Offline doubles for fetchers, searchers and models.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use async_trait::async_trait;
use tokio::time::Instant;
use br_core::{
    ArticleLink, Error, PageFetcher, ReferenceArticle, Result, RewriteModel, SearchHit, WebSearcher,
};

pub fn link(title: &str, url: &str) -> ArticleLink {
    ArticleLink {
        title: title.to_string(),
        url: url.to_string(),
    }
}

pub fn hit(url: &str) -> SearchHit {
    SearchHit {
        link: url.to_string(),
        title: String::new(),
    }
}

/// A listing page with one `h2` per link and pagination anchors for `pages`.
pub fn listing_html(links: &[(&str, &str)], pages: &[u32]) -> String {
    let headings: String = links
        .iter()
        .map(|(title, url)| format!("<h2 class=\"entry-title\"><a href=\"{}\">{}</a></h2>\n", url, title))
        .collect();
    let pagination: String = pages
        .iter()
        .map(|n| format!("<a class=\"page-numbers\" href=\"https://beyondchats.com/blogs/page/{}/\">{}</a>\n", n, n))
        .collect();
    format!(
        "<html><body><main>{}</main><nav class=\"pagination\">{}</nav></body></html>",
        headings, pagination
    )
}

/// Serves canned pages; any other URL is a fetch error. Every request is timestamped.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<(String, Instant)>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn request_times(&self) -> Vec<(String, Instant)> {
        self.requests.lock().unwrap().clone()
    }
}

/// Elapsed time between each pair of consecutive instants.
pub fn gaps(times: &[Instant]) -> Vec<std::time::Duration> {
    times.windows(2).map(|w| w[1] - w[0]).collect()
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push((url.to_string(), Instant::now()));
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Scraping(format!("404 Not Found: {}", url)))
    }
}

/// Returns the same hits for every query, or always fails.
pub struct StaticSearcher {
    hits: Vec<SearchHit>,
    fail: bool,
    queries: Mutex<Vec<(String, usize)>>,
}

impl StaticSearcher {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for StaticSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.queries.lock().unwrap().push((query.to_string(), max_results));
        if self.fail {
            return Err(Error::Search("quota exceeded".to_string()));
        }
        Ok(self.hits.clone())
    }
}

/// Replies with a fixed body and counts calls.
pub struct CountingModel {
    reply: Result<String>,
    calls: AtomicUsize,
    called_at: Mutex<Vec<Instant>>,
    seen_references: Mutex<Vec<Vec<ReferenceArticle>>>,
}

impl fmt::Debug for CountingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingModel")
            .field("calls", &self.calls())
            .finish()
    }
}

impl CountingModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            called_at: Mutex::new(Vec::new()),
            seen_references: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(Error::Inference("model overloaded".to_string())),
            ..Self::replying("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn called_at(&self) -> Vec<Instant> {
        self.called_at.lock().unwrap().clone()
    }

    pub fn seen_references(&self) -> Vec<Vec<ReferenceArticle>> {
        self.seen_references.lock().unwrap().clone()
    }
}

#[async_trait]
impl RewriteModel for CountingModel {
    fn name(&self) -> &str {
        "Counting"
    }

    async fn rewrite_article(&self, _original: &str, references: &[ReferenceArticle]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.called_at.lock().unwrap().push(Instant::now());
        self.seen_references.lock().unwrap().push(references.to_vec());
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(e) => Err(Error::Inference(e.to_string())),
        }
    }
}
