use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use br_core::{Error, ReferenceArticle, Result, RewriteModel};
use tracing::debug;
use crate::prompt::build_rewrite_prompt;
use crate::Config;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Text of the first completion, or empty when there is none.
    fn first_completion(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default()
    }
}

/// Chat-completions client for Groq's OpenAI-compatible endpoint.
pub struct GroqModel {
    client: Client,
    api_key: String,
    base_url: String,
    model_id: String,
    temperature: f32,
    max_tokens: u32,
}

impl fmt::Debug for GroqModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .finish()
    }
}

impl GroqModel {
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("Groq API key is required".to_string()))?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_id: config.model_id,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn build_request(&self, prompt: String) -> ChatRequest {
        ChatRequest {
            model: self.model_id.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl RewriteModel for GroqModel {
    fn name(&self) -> &str {
        "Groq"
    }

    async fn rewrite_article(&self, original: &str, references: &[ReferenceArticle]) -> Result<String> {
        let request = self.build_request(build_rewrite_prompt(original, references));
        debug!("Sending rewrite request to {} ({})", self.base_url, self.model_id);

        let response = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!("{} returned {}: {}", self.name(), status, body)));
        }

        let response = response.json::<ChatResponse>().await?;
        Ok(response.first_completion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> GroqModel {
        GroqModel::new(Config {
            api_key: Some("test-key".to_string()),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn test_model_requires_api_key() {
        let result = GroqModel::new(Config::default());
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "Configuration error: Groq API key is required");

        let result = GroqModel::new(Config {
            api_key: Some(String::new()),
            ..Config::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_request_shape() {
        let request = model().build_request("Rewrite this".to_string());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "openai/gpt-oss-20b");
        assert_eq!(json["max_tokens"], 4000);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Rewrite this");
    }

    #[test]
    fn test_first_completion() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"New body"}},{"message":{"content":"ignored"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_completion(), "New body");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.first_completion(), "");

        let null_content: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(null_content.first_completion(), "");
    }
}
