//! Article body extraction with ordered selector fallbacks.

use br_core::text::{normalize_whitespace, truncate_chars};
use br_core::PageFetcher;
use scraper::Html;
use tracing::warn;
use super::utils::parse_selector;

/// Which selectors to try, what to strip first, and how much text to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractProfile {
    pub selectors: &'static [&'static str],
    pub strip: &'static [&'static str],
    pub max_chars: usize,
}

/// First scrape of a discovered article.
pub const ARTICLE_PROFILE: ExtractProfile = ExtractProfile {
    selectors: &["article", ".entry-content", ".post-content", "body"],
    strip: &[],
    max_chars: 10_000,
};

/// Third-party reference pages: chrome removed, smaller budget.
pub const REFERENCE_PROFILE: ExtractProfile = ExtractProfile {
    selectors: &["article", ".post-content", ".entry-content", "main", "body"],
    strip: &[
        "script",
        "style",
        "nav",
        "header",
        "footer",
        "aside",
        ".sidebar",
        ".comments",
        ".advertisement",
    ],
    max_chars: 5_000,
};

fn strip_elements(document: &mut Html, selectors: &[&str]) {
    for raw in selectors {
        let Ok(selector) = parse_selector(raw) else {
            continue;
        };
        let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

/// Text of every element matching `selector`, normalized; `None` when empty.
fn selector_text(document: &Html, selector: &str) -> Option<String> {
    let selector = parse_selector(selector).ok()?;
    let text = document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");
    let text = normalize_whitespace(&text);
    (!text.is_empty()).then_some(text)
}

/// Text from the first selector in the profile that matches and has text.
pub fn extract_content(html: &str, profile: &ExtractProfile) -> Option<String> {
    let mut document = Html::parse_document(html);
    strip_elements(&mut document, profile.strip);

    profile
        .selectors
        .iter()
        .find_map(|selector| selector_text(&document, selector))
        .map(|text| truncate_chars(&text, profile.max_chars).to_string())
}

/// Fetch and extract; failures are logged and become `None`.
pub async fn scrape_content(fetcher: &dyn PageFetcher, url: &str, profile: &ExtractProfile) -> Option<String> {
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Error scraping content from {}: {}", url, e);
            return None;
        }
    };
    extract_content(&html, profile)
}
