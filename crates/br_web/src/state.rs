use std::sync::Arc;
use br_core::ArticleStorage;

pub struct AppState {
    pub storage: Arc<dyn ArticleStorage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn ArticleStorage>) -> Self {
        Self { storage }
    }
}
