//! The small markdown dialect the rewrite model produces, rendered to HTML.
//!
//! Supported: `#`/`##`/`###` headings, `-`/`*`/`•` bullets, `1.` numbered
//! items, `---` rules, `**bold**`, `*italic*` and blank-line paragraphs.
//! Everything else passes through as escaped text.

use br_core::text::truncate_chars;
use crate::views::html_escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Numbered => "ol",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading(usize, &'a str),
    Rule,
    Item(ListKind, &'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.len() >= 3 && line.chars().all(|c| c == '-') {
        return Line::Rule;
    }
    let level = line.chars().take_while(|c| *c == '#').count();
    if (1..=3).contains(&level) {
        let rest = line[level..].trim();
        // a bare marker is an empty heading and renders nothing
        if rest.is_empty() {
            return Line::Blank;
        }
        return Line::Heading(level, rest);
    }
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Line::Item(ListKind::Bullet, rest.trim());
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Line::Item(ListKind::Numbered, rest.trim());
        }
    }
    Line::Text(line)
}

/// Wraps each non-empty `delim ... delim` pair in `tag`, shortest match first.
fn wrap_pairs(text: &str, delim: &str, tag: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(delim) {
        let after = &rest[start + delim.len()..];
        let Some(first) = after.chars().next() else {
            break;
        };
        let Some(end) = after[first.len_utf8()..]
            .find(delim)
            .map(|i| i + first.len_utf8())
        else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&format!("<{}>{}</{}>", tag, &after[..end], tag));
        rest = &after[end + delim.len()..];
    }

    out.push_str(rest);
    out
}

fn inline(text: &str) -> String {
    wrap_pairs(&wrap_pairs(text, "**", "strong"), "*", "em")
}

#[derive(Default)]
struct Renderer {
    html: String,
    paragraph: Vec<String>,
    list: Option<(ListKind, Vec<String>)>,
}

impl Renderer {
    fn flush(&mut self) {
        if !self.paragraph.is_empty() {
            self.html.push_str(&format!("<p>{}</p>", self.paragraph.join("<br>")));
            self.paragraph.clear();
        }
        if let Some((kind, items)) = self.list.take() {
            let items: String = items.iter().map(|i| format!("<li>{}</li>", i)).collect();
            self.html.push_str(&format!("<{0}>{1}</{0}>", kind.tag(), items));
        }
    }

    fn push(&mut self, line: Line<'_>) {
        match line {
            Line::Blank => self.flush(),
            Line::Rule => {
                self.flush();
                self.html.push_str("<hr>");
            }
            Line::Heading(level, text) => {
                self.flush();
                self.html.push_str(&format!("<h{0}>{1}</h{0}>", level, inline(text)));
            }
            Line::Item(kind, text) => {
                if !self.paragraph.is_empty() || self.list.as_ref().is_some_and(|(k, _)| *k != kind) {
                    self.flush();
                }
                self.list
                    .get_or_insert_with(|| (kind, Vec::new()))
                    .1
                    .push(inline(text));
            }
            Line::Text(text) => {
                if self.list.is_some() {
                    self.flush();
                }
                self.paragraph.push(inline(text));
            }
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.html
    }
}

/// Escapes the input, then renders the supported subset.
pub fn render_markdown(text: &str) -> String {
    let escaped = html_escape(text);
    let mut renderer = Renderer::default();
    for line in escaped.lines() {
        renderer.push(classify(line));
    }
    renderer.finish()
}

/// Plain-text preview with markdown markers removed, cut at `max_chars`.
pub fn preview(text: &str, max_chars: usize) -> String {
    let plain = text
        .lines()
        .map(|line| match classify(line) {
            Line::Heading(_, rest) | Line::Item(ListKind::Bullet, rest) => rest.to_string(),
            Line::Blank => String::new(),
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
        .replace("**", "")
        .replace('*', "");

    let cut = truncate_chars(&plain, max_chars);
    if cut.len() < plain.len() {
        format!("{}...", cut)
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_then_list() {
        assert_eq!(
            render_markdown("## Title\n\n- a\n- b"),
            "<h2>Title</h2><ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_headings_and_rule() {
        assert_eq!(
            render_markdown("# One\n### Three\n---\n## Two"),
            "<h1>One</h1><h3>Three</h3><hr><h2>Two</h2>"
        );
    }

    #[test]
    fn test_bare_or_unspaced_heading_markers() {
        assert_eq!(render_markdown("##Title\n###\nBody"), "<h2>Title</h2><p>Body</p>");
        assert_eq!(render_markdown("#\n##\n###"), "");
        assert_eq!(preview("##Title\n#", 250), "Title\n");
        // four or more markers are plain text
        assert_eq!(render_markdown("#### deep"), "<p>#### deep</p>");
    }

    #[test]
    fn test_bullet_markers_and_numbered_lists() {
        assert_eq!(
            render_markdown("* x\n• y\n1. first\n2. second"),
            "<ul><li>x</li><li>y</li></ul><ol><li>first</li><li>second</li></ol>"
        );
    }

    #[test]
    fn test_paragraphs_and_line_breaks() {
        assert_eq!(
            render_markdown("one\ntwo\n\n\nthree"),
            "<p>one<br>two</p><p>three</p>"
        );
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn test_inline_emphasis() {
        assert_eq!(
            render_markdown("A **bold** and *soft* word"),
            "<p>A <strong>bold</strong> and <em>soft</em> word</p>"
        );
        assert_eq!(render_markdown("2 * 3 = 6"), "<p>2 * 3 = 6</p>");
        assert_eq!(render_markdown("**"), "<p>**</p>");
    }

    #[test]
    fn test_html_is_escaped() {
        assert_eq!(
            render_markdown("<script>alert('x')</script>"),
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</p>"
        );
        assert_eq!(render_markdown("- a & b"), "<ul><li>a &amp; b</li></ul>");
    }

    #[test]
    fn test_references_block() {
        let html = render_markdown("Body\n\n---\n\n**References:**\n1. https://a.com\n2. https://b.com");
        assert_eq!(
            html,
            "<p>Body</p><hr><p><strong>References:</strong></p><ol><li>https://a.com</li><li>https://b.com</li></ol>"
        );
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("## Title\n- **a** item", 250), "Title\na item");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
    }
}
