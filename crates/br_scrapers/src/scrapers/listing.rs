//! Listing-page parsing and oldest-first link selection.

use std::collections::HashSet;
use std::ops::ControlFlow;
use br_core::text::normalize_whitespace;
use br_core::ArticleLink;
use scraper::{Html, Selector};
use url::Url;

/// Number of articles the discovery job keeps.
pub const OLDEST_LIMIT: usize = 5;

const EXCLUDED_SEGMENTS: &[&str] = &["/tag/", "/category/"];

/// Page 1 is the listing root, later pages live under `page/<n>/`.
pub fn page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        return base_url.to_string();
    }
    let separator = if base_url.ends_with('/') { "" } else { "/" };
    format!("{}{}page/{}/", base_url, separator, page)
}

/// Highest `<base path>page/<n>` number among the page's anchors.
pub fn parse_last_page(html: &str, base_url: &Url) -> Option<u32> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").ok()?;

    let mut base_path = base_url.path().to_string();
    if !base_path.ends_with('/') {
        base_path.push('/');
    }
    let marker = format!("{}page/", base_path);

    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| {
            let (_, rest) = href.split_once(marker.as_str())?;
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        })
        .filter(|&page| page >= 1)
        .max()
}

pub fn is_article_url(url: &str, link_marker: &str) -> bool {
    url.contains(link_marker) && !EXCLUDED_SEGMENTS.iter().any(|segment| url.contains(segment))
}

/// First anchor inside each `h2`, resolved against the page URL and filtered to site articles.
pub fn parse_article_links(html: &str, page_url: &Url, link_marker: &str) -> Vec<ArticleLink> {
    let document = Html::parse_document(html);
    let (Ok(headings), Ok(anchors)) = (Selector::parse("h2"), Selector::parse("a")) else {
        return Vec::new();
    };

    document
        .select(&headings)
        .filter_map(|heading| heading.select(&anchors).next())
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            let url = page_url.join(href).ok()?.to_string();
            let title = normalize_whitespace(&link.text().collect::<String>());
            (!title.is_empty() && is_article_url(&url, link_marker))
                .then_some(ArticleLink { title, url })
        })
        .collect()
}

/// Unique links in first-seen order, capped at a limit once finished.
#[derive(Debug, Clone, Default)]
pub struct LinkAccumulator {
    links: Vec<ArticleLink>,
    seen: HashSet<String>,
    limit: usize,
}

impl LinkAccumulator {
    pub fn new(limit: usize) -> Self {
        Self {
            links: Vec::new(),
            seen: HashSet::new(),
            limit,
        }
    }

    /// Folds one page's links in, dropping URLs already collected.
    pub fn absorb(mut self, page: Vec<ArticleLink>) -> Self {
        for link in page {
            if self.seen.insert(link.url.clone()) {
                self.links.push(link);
            }
        }
        self
    }

    pub fn is_full(&self) -> bool {
        self.links.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn finish(mut self) -> Vec<ArticleLink> {
        self.links.truncate(self.limit);
        self.links
    }
}

/// Folds pages (already ordered last page first) until `limit` unique links are held.
pub fn select_oldest<I>(pages: I, limit: usize) -> Vec<ArticleLink>
where
    I: IntoIterator<Item = Vec<ArticleLink>>,
{
    let folded = pages
        .into_iter()
        .try_fold(LinkAccumulator::new(limit), |acc, page| {
            let acc = acc.absorb(page);
            if acc.is_full() {
                ControlFlow::Break(acc)
            } else {
                ControlFlow::Continue(acc)
            }
        });

    match folded {
        ControlFlow::Break(acc) | ControlFlow::Continue(acc) => acc.finish(),
    }
}
