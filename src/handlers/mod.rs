//! HTTP handlers, split by access tier:
//! `public` (anonymous), `auth` (login) and `admin` (bearer token required).

pub mod admin;
pub mod auth;
pub mod public;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// `:id` path segment parsed as a UUID, rejected as a JSON 400 otherwise
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for IdPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(IdPath(id))
    }
}

/// GET /health - liveness check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
