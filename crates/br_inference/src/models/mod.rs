use std::sync::Arc;
use br_core::{Error, Result, RewriteModel};
use crate::Config;

pub mod dummy;
pub mod groq;

pub use dummy::DummyModel;
pub use groq::GroqModel;

/// Builds the rewrite model named by `config.model_name` (defaults to `groq`).
pub fn create_model(config: Option<Config>) -> Result<Arc<dyn RewriteModel>> {
    let config = config.unwrap_or_default();
    let name = config.model_name.clone().unwrap_or_else(|| "groq".to_string());

    match name.to_lowercase().as_str() {
        "groq" => Ok(Arc::new(GroqModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "Unknown model: {}. Available models: groq, dummy",
            other
        ))),
    }
}
