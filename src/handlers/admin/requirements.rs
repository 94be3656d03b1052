use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::database::models::{Note, Requirement};
use crate::error::ApiResult;
use crate::handlers::IdPath;
use crate::schemas::note::NoteCreate;
use crate::schemas::requirement::{ProgressUpdate, StatusUpdate};
use crate::schemas::Valid;
use crate::services::RequirementService;
use crate::state::AppState;

/// GET /api/admin/requirements - newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Requirement>>> {
    Ok(Json(RequirementService::new(state.pool).list().await?))
}

/// GET /api/admin/requirements/:id
pub async fn get(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Json<Requirement>> {
    Ok(Json(RequirementService::new(state.pool).get(id).await?))
}

/// PATCH /api/admin/requirements/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Valid(input): Valid<StatusUpdate>,
) -> ApiResult<Json<Requirement>> {
    let requirement = RequirementService::new(state.pool)
        .update_status(id, input.status)
        .await?;
    info!(requirement_id = %id, status = ?requirement.status, "Requirement status changed");
    Ok(Json(requirement))
}

/// PATCH /api/admin/requirements/:id/progress
pub async fn update_progress(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Valid(input): Valid<ProgressUpdate>,
) -> ApiResult<Json<Requirement>> {
    let requirement = RequirementService::new(state.pool)
        .update_progress(id, input.progress)
        .await?;
    Ok(Json(requirement))
}

/// POST /api/admin/requirements/:id/notes
pub async fn create_note(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Valid(input): Valid<NoteCreate>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let note = RequirementService::new(state.pool)
        .add_note(id, &input.content)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/admin/requirements/:id/notes - newest first
pub async fn list_notes(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Json<Vec<Note>>> {
    Ok(Json(RequirementService::new(state.pool).list_notes(id).await?))
}
