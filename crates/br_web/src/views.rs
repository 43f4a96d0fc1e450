use br_core::Article;
use serde::Deserialize;
use crate::markdown::{preview, render_markdown};

pub const PREVIEW_CHARS: usize = 250;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    #[serde(alias = "original")]
    All,
    Updated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    #[default]
    Original,
    Updated,
}

pub fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body{{font-family:system-ui,sans-serif;max-width:960px;margin:0 auto;padding:1rem;color:#222;}}
.tabs a{{margin-right:1rem;}}
.tabs a.active{{font-weight:bold;}}
.card{{border:1px solid #ddd;border-radius:8px;padding:1rem;margin:1rem 0;}}
.badge{{font-size:.8rem;padding:.1rem .5rem;border-radius:4px;background:#eee;}}
.badge.updated{{background:#d4f5dd;}}
.empty-state{{text-align:center;color:#666;padding:3rem 0;}}
.preview{{white-space:pre-line;color:#444;}}
</style>
</head>
<body>
<header>
    <h1><a href="/">📚 Blog Articles</a></h1>
    <p>Original and AI-updated versions of scraped blog articles</p>
</header>
{content}
</body>
</html>"#,
        title = html_escape(title),
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn card(article: &Article) -> String {
    let (badge_class, badge) = if article.is_refreshed() {
        ("updated", "✓ Enhanced")
    } else {
        ("original", "Original")
    };
    let updated_link = if article.is_refreshed() {
        format!(" <a href=\"/articles/{}?version=updated\">✨ AI Updated</a>", article.id)
    } else {
        String::new()
    };

    format!(
        "<div class=\"card\"><h2>{}</h2><div class=\"preview\">{}</div>\
         <p><a href=\"/articles/{}?version=original\">📄 Original</a>{} \
         <span class=\"badge {}\">{}</span></p></div>",
        html_escape(&article.title),
        html_escape(&preview(&article.original_content, PREVIEW_CHARS)),
        article.id,
        updated_link,
        badge_class,
        badge
    )
}

pub fn index_page(articles: &[Article], tab: Tab) -> String {
    let updated_count = articles.iter().filter(|a| a.is_refreshed()).count();
    let shown: Vec<&Article> = articles
        .iter()
        .filter(|a| tab == Tab::All || a.is_refreshed())
        .collect();

    let active = |t: Tab| if t == tab { " class=\"active\"" } else { "" };
    let tabs = format!(
        "<nav class=\"tabs\"><a href=\"/?tab=all\"{}>All ({})</a><a href=\"/?tab=updated\"{}>AI Updated ({})</a></nav>",
        active(Tab::All),
        articles.len(),
        active(Tab::Updated),
        updated_count
    );

    let content = if shown.is_empty() {
        "<div class=\"empty-state\"><h3>No articles found</h3>\
         <p>Run the discover job to fetch articles from the blog</p></div>"
            .to_string()
    } else {
        shown.iter().map(|a| card(a)).collect()
    };

    build_page("Articles", &format!("{}{}", tabs, content))
}

pub fn article_page(article: &Article, version: Version) -> String {
    let show_updated = version == Version::Updated && article.is_refreshed();
    let body = match (&article.updated_content, show_updated) {
        (Some(updated), true) => updated.as_str(),
        _ => article.original_content.as_str(),
    };

    let toggle = if article.is_refreshed() {
        format!(
            "<nav class=\"tabs\"><a href=\"/articles/{0}?version=original\"{1}>📄 Original</a>\
             <a href=\"/articles/{0}?version=updated\"{2}>✨ AI Updated</a></nav>",
            article.id,
            if show_updated { "" } else { " class=\"active\"" },
            if show_updated { " class=\"active\"" } else { "" }
        )
    } else {
        String::new()
    };

    let references = if show_updated && !article.references.is_empty() {
        let links: String = article
            .references
            .iter()
            .enumerate()
            .map(|(i, url)| {
                let url = html_escape(url);
                format!("<li><a href=\"{0}\" rel=\"noopener noreferrer\">{1}. {0}</a></li>", url, i + 1)
            })
            .collect();
        format!("<div class=\"references\"><h4>📎 References</h4><ul>{}</ul></div>", links)
    } else {
        String::new()
    };

    build_page(
        &article.title,
        &format!(
            "<article><h2>{}</h2>{}<div class=\"formatted-content\">{}</div>{}\
             <p><a href=\"{}\" rel=\"noopener noreferrer\">🔗 View original source</a></p></article>",
            html_escape(&article.title),
            toggle,
            render_markdown(body),
            references,
            html_escape(&article.source_url)
        ),
    )
}

pub fn not_found_page() -> String {
    build_page(
        "Not found",
        "<div class=\"empty-state\"><h3>Article not found</h3><p><a href=\"/\">Back to all articles</a></p></div>",
    )
}
