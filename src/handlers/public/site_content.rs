use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::schemas::site_content::SiteContentResponse;
use crate::services::SiteContentService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SiteContentQuery {
    pub key: Option<String>,
}

/// GET /api/public/site-content?key= - every entry, or the one matching `key`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SiteContentQuery>,
) -> ApiResult<Json<Vec<SiteContentResponse>>> {
    let items = SiteContentService::new(state.pool)
        .list(query.key.as_deref())
        .await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
