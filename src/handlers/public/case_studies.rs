use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ApiResult;
use crate::schemas::case_study::CaseStudyResponse;
use crate::services::CaseStudyService;
use crate::state::AppState;

/// GET /api/public/case-studies - active case studies in display order
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<CaseStudyResponse>>> {
    let studies = CaseStudyService::new(state.pool).list_active().await?;
    Ok(Json(studies.into_iter().map(Into::into).collect()))
}

/// GET /api/public/case-studies/:slug
pub async fn get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<CaseStudyResponse>> {
    let study = CaseStudyService::new(state.pool).get_active_by_slug(&slug).await?;
    Ok(Json(study.into()))
}
