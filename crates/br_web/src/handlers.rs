use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use br_core::Article;
use serde::Deserialize;
use serde_json::json;
use crate::views::{self, Tab, Version};
use crate::AppState;

/// Read-side failures, rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(i64),
    Storage(br_core::Error),
}

impl From<br_core::Error> for ApiError {
    fn from(e: br_core::Error) -> Self {
        ApiError::Storage(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Article {} not found", id)),
            ApiError::Storage(e) => {
                tracing::error!("Error fetching articles: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.storage.list_articles().await?))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Article>, ApiError> {
    state
        .storage
        .get_article(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    #[serde(default)]
    pub tab: Tab,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArticleQuery {
    #[serde(default)]
    pub version: Version,
}

fn server_error(e: br_core::Error) -> Response {
    tracing::error!("Error rendering page: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::build_page(
            "Server error",
            &format!("<p>Server error: {}</p>", views::html_escape(&e.to_string())),
        )),
    )
        .into_response()
}

pub async fn index_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IndexQuery>,
) -> Response {
    match state.storage.list_articles().await {
        Ok(articles) => Html(views::index_page(&articles, query.tab)).into_response(),
        Err(e) => server_error(e),
    }
}

pub async fn article_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<ArticleQuery>,
) -> Response {
    match state.storage.get_article(id).await {
        Ok(Some(article)) => Html(views::article_page(&article, query.version)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response(),
        Err(e) => server_error(e),
    }
}
