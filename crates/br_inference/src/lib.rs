use std::fmt;

pub mod models;
pub mod prompt;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL_ID: &str = "openai/gpt-oss-20b";

#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    /// Provider: `groq` or `dummy`
    pub model_name: Option<String>,
    pub model_id: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::models::create_model;
    pub use br_core::{ReferenceArticle, Result, Error, RewriteModel};
}

pub use models::create_model;
