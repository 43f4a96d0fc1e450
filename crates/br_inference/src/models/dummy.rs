use std::fmt;
use async_trait::async_trait;
use br_core::{ReferenceArticle, Result, RewriteModel};

/// Offline stand-in: echoes the original with a heading and one line per reference.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RewriteModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn rewrite_article(&self, original: &str, references: &[ReferenceArticle]) -> Result<String> {
        if original.trim().is_empty() {
            return Ok(String::new());
        }

        let mut body = format!("## Updated article\n\n{}", original.trim());
        if !references.is_empty() {
            body.push_str("\n\n## Further reading\n");
            for reference in references {
                let words: Vec<&str> = reference.content.split_whitespace().take(12).collect();
                body.push_str(&format!("\n- {}", words.join(" ")));
            }
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();
        let references = vec![ReferenceArticle {
            url: "https://ref.com".to_string(),
            content: "Reference text about chatbots".to_string(),
        }];

        let rewritten = model.rewrite_article("Original body.", &references).await.unwrap();
        assert!(rewritten.starts_with("## Updated article"));
        assert!(rewritten.contains("Original body."));
        assert!(rewritten.contains("- Reference text about chatbots"));

        let empty = model.rewrite_article("   ", &references).await.unwrap();
        assert!(empty.is_empty());
    }
}
