use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiResult;
use crate::handlers::IdPath;
use crate::schemas::site_content::{SiteContentCreate, SiteContentResponse, SiteContentUpdate};
use crate::schemas::Valid;
use crate::services::SiteContentService;
use crate::state::AppState;

/// GET /api/admin/site-content - ordered by key
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<SiteContentResponse>>> {
    let items = SiteContentService::new(state.pool).list(None).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// POST /api/admin/site-content
pub async fn create(
    State(state): State<AppState>,
    Valid(input): Valid<SiteContentCreate>,
) -> ApiResult<(StatusCode, Json<SiteContentResponse>)> {
    let item = SiteContentService::new(state.pool).create(input).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// PATCH /api/admin/site-content/:id
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Valid(patch): Valid<SiteContentUpdate>,
) -> ApiResult<Json<SiteContentResponse>> {
    let item = SiteContentService::new(state.pool).update(id, patch).await?;
    Ok(Json(item.into()))
}

/// DELETE /api/admin/site-content/:id - hard delete
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<StatusCode> {
    SiteContentService::new(state.pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
