use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ApiResult;
use crate::schemas::service::ServiceResponse;
use crate::services::CatalogService;
use crate::state::AppState;

/// GET /api/public/services
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ServiceResponse>>> {
    let services = CatalogService::new(state.pool).list_services().await?;
    Ok(Json(services.into_iter().map(Into::into).collect()))
}

/// GET /api/public/services/:slug
pub async fn get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ServiceResponse>> {
    let service = CatalogService::new(state.pool).get_service_by_slug(&slug).await?;
    Ok(Json(service.into()))
}
