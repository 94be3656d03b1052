use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::TokenService;
use crate::error::ApiError;

/// Subject of the verified bearer token, available to admin handlers
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
}

/// Rejects the request unless it carries a valid bearer token.
///
/// No header (or a non-Bearer scheme) is 403; a token that fails
/// verification for any reason is 401.
pub async fn require_bearer(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())
        .ok_or_else(|| ApiError::forbidden("Not authenticated"))?;

    let subject = tokens.verify_access_token(token).ok_or_else(|| {
        tracing::info!(path = %request.uri().path(), "Rejected bearer token");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthUser { subject });
    Ok(next.run(request).await)
}

/// Token from `Authorization: Bearer <token>`; the scheme is case-insensitive
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    const SECRET: &str = "unit-secret";

    fn guarded_app() -> Router {
        Router::new()
            .route("/", get(|Extension(user): Extension<AuthUser>| async move { user.subject }))
            .route_layer(from_fn_with_state(TokenService::new(SECRET, 60), require_bearer))
    }

    async fn call(authorization: Option<String>) -> axum::response::Response {
        let mut request = axum::http::Request::builder().uri("/");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        guarded_app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_bearer_tokens() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer(&headers("bearer abc")), Some("abc"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_missing() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
        assert_eq!(extract_bearer(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer(&headers("Bearer ")), None);
        assert_eq!(extract_bearer(&headers("Bearer")), None);
    }

    #[tokio::test]
    async fn missing_header_is_forbidden() {
        assert_eq!(call(None).await.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn bad_token_is_unauthorized() {
        let response = call(Some("Bearer garbage".into())).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[tokio::test]
    async fn valid_token_exposes_subject() {
        let token = TokenService::new(SECRET, 60).create_access_token("42").unwrap();
        let response = call(Some(format!("Bearer {}", token))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"42");
    }
}
