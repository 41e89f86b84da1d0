//! Legal news endpoint.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{NewsFilters, NewsResponse};

/// `GET /api/news` — a page of legal news, served from cache when fresh.
pub async fn legal_news(
    State(ctx): State<ApiContext>,
    Query(filters): Query<NewsFilters>,
) -> Result<Json<NewsResponse>, ApiError> {
    let page = ctx.news.fetch_legal_news(&filters).await?;
    Ok(Json(page))
}
