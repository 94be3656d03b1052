use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::info;

use crate::error::ApiResult;
use crate::handlers::IdPath;
use crate::middleware::AuthUser;
use crate::schemas::case_study::{CaseStudyAdminResponse, CaseStudyCreate, CaseStudyUpdate};
use crate::schemas::Valid;
use crate::services::CaseStudyService;
use crate::state::AppState;

/// GET /api/admin/case-studies - all rows, including inactive ones
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<CaseStudyAdminResponse>>> {
    let studies = CaseStudyService::new(state.pool).list_all().await?;
    Ok(Json(studies.into_iter().map(Into::into).collect()))
}

/// GET /api/admin/case-studies/:id
pub async fn get(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<CaseStudyAdminResponse>> {
    let study = CaseStudyService::new(state.pool).get(id).await?;
    Ok(Json(study.into()))
}

/// POST /api/admin/case-studies
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Valid(input): Valid<CaseStudyCreate>,
) -> ApiResult<(StatusCode, Json<CaseStudyAdminResponse>)> {
    let study = CaseStudyService::new(state.pool).create(input).await?;
    info!(case_study = %study.slug, by = %user.subject, "Case study created");
    Ok((StatusCode::CREATED, Json(study.into())))
}

/// PATCH /api/admin/case-studies/:id - only supplied fields change
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Valid(patch): Valid<CaseStudyUpdate>,
) -> ApiResult<Json<CaseStudyAdminResponse>> {
    let study = CaseStudyService::new(state.pool).update(id, patch).await?;
    Ok(Json(study.into()))
}

/// DELETE /api/admin/case-studies/:id - soft delete
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    CaseStudyService::new(state.pool).soft_delete(id).await?;
    info!(case_study_id = %id, by = %user.subject, "Case study deactivated");
    Ok(StatusCode::NO_CONTENT)
}
