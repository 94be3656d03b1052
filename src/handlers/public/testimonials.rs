use axum::{extract::State, Json};

use crate::error::ApiResult;
use crate::schemas::testimonial::TestimonialResponse;
use crate::services::CatalogService;
use crate::state::AppState;

/// GET /api/public/testimonials - newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<TestimonialResponse>>> {
    let testimonials = CatalogService::new(state.pool).list_testimonials().await?;
    Ok(Json(testimonials.into_iter().map(Into::into).collect()))
}
