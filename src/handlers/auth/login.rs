use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::auth::verify_password_blocking;
use crate::error::{ApiError, ApiResult};
use crate::schemas::auth::{LoginRequest, LoginResponse};
use crate::schemas::Valid;
use crate::services::UserService;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/auth/login - exchange admin credentials for a bearer token
///
/// Unknown email and wrong password produce the same 401 after the same
/// amount of bcrypt work.
pub async fn login(
    State(state): State<AppState>,
    Valid(input): Valid<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = UserService::new(state.pool).find_by_email(&input.email).await?;

    let Some(user) = user else {
        verify_password_blocking(input.password, state.login_decoy.to_string()).await?;
        warn!("Login failed: unknown account");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password_blocking(input.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.create_access_token(&user.id.to_string())?;
    info!(user_id = %user.id, "Admin logged in");
    Ok(Json(LoginResponse::bearer(token)))
}
