use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::database::models::Requirement;
use crate::error::ApiResult;
use crate::schemas::requirement::RequirementCreate;
use crate::schemas::Valid;
use crate::services::RequirementService;
use crate::state::AppState;

/// POST /api/public/requirements - submit a lead (rate limited per IP)
pub async fn create(
    State(state): State<AppState>,
    Valid(input): Valid<RequirementCreate>,
) -> ApiResult<(StatusCode, Json<Requirement>)> {
    let requirement = RequirementService::new(state.pool).create(input).await?;
    info!(requirement_id = %requirement.id, kind = ?requirement.kind, "Lead submitted");
    Ok((StatusCode::CREATED, Json(requirement)))
}
