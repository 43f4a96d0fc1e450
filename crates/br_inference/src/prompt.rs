//! Rewrite prompt construction.

use br_core::text::truncate_chars;
use br_core::ReferenceArticle;

pub const ORIGINAL_LIMIT: usize = 3000;
pub const REFERENCES_LIMIT: usize = 4000;

const INSTRUCTIONS: &str = "INSTRUCTIONS:
1. Improve the formatting, structure, and readability of the original article
2. Add relevant insights from the reference articles
3. Keep the main topic and message intact
4. Make it more engaging and professional
5. Add clear headings and bullet points where appropriate
6. Keep the content length similar to the original
7. Write in a professional but conversational tone

Return ONLY the improved article content. Do not include any explanations or meta-commentary.";

/// Labels each reference with its source URL and joins them with rule separators.
pub fn render_references(references: &[ReferenceArticle]) -> String {
    references
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Reference {} ({}):\n{}", i + 1, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

pub fn build_rewrite_prompt(original: &str, references: &[ReferenceArticle]) -> String {
    let references_text = render_references(references);

    format!(
        "You are a professional content writer. Your task is to improve and update the following article based on the reference articles provided.

ORIGINAL ARTICLE:
{}

REFERENCE ARTICLES FROM TOP GOOGLE RESULTS:
{}

{}",
        truncate_chars(original, ORIGINAL_LIMIT),
        truncate_chars(&references_text, REFERENCES_LIMIT),
        INSTRUCTIONS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(url: &str, content: &str) -> ReferenceArticle {
        ReferenceArticle {
            url: url.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_references_are_labelled() {
        let text = render_references(&[
            reference("https://a.com", "alpha"),
            reference("https://b.com", "beta"),
        ]);
        assert_eq!(
            text,
            "Reference 1 (https://a.com):\nalpha\n\n---\n\nReference 2 (https://b.com):\nbeta"
        );
    }

    #[test]
    fn test_prompt_truncates_inputs() {
        let original = "o".repeat(ORIGINAL_LIMIT + 500);
        let references = vec![
            reference("https://a.com", &"a".repeat(3000)),
            reference("https://b.com", &"b".repeat(3000)),
        ];
        let prompt = build_rewrite_prompt(&original, &references);

        assert!(prompt.contains("\n\nREFERENCE ARTICLES FROM TOP GOOGLE RESULTS:\n"));
        assert!(prompt.contains(&"o".repeat(ORIGINAL_LIMIT)));
        assert!(!prompt.contains(&"o".repeat(ORIGINAL_LIMIT + 1)));

        let rendered = render_references(&references);
        assert!(prompt.contains(truncate_chars(&rendered, REFERENCES_LIMIT)));
        assert!(!prompt.contains(&rendered));
        assert!(prompt.contains("Reference 1 (https://a.com)"));
        assert!(prompt.contains("Return ONLY the improved article content"));
    }
}
