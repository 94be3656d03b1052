pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod schemas;
pub mod services;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{admin, auth as auth_handlers, public};
use crate::services::upload_service::PUBLIC_PREFIX;
pub use crate::state::AppState;

/// Multipart framing allowance on top of the file size ceiling
const UPLOAD_BODY_SLACK: usize = 64 * 1024;

/// Full HTTP surface
pub fn app(state: AppState) -> Router {
    let upload_dir = state.uploads.dir().to_path_buf();

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/public", public_routes(&state))
        .nest("/api/auth", auth_routes(&state))
        .nest("/api/admin", admin_routes(&state))
        .nest_service(PUBLIC_PREFIX, ServeDir::new(upload_dir))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/requirements",
            post(public::requirements::create).route_layer(from_fn_with_state(
                state.requirement_limiter.clone(),
                middleware::rate_limit,
            )),
        )
        .route("/case-studies", get(public::case_studies::list))
        .route("/case-studies/:slug", get(public::case_studies::get))
        .route("/services", get(public::services::list))
        .route("/services/:slug", get(public::services::get))
        .route("/testimonials", get(public::testimonials::list))
        .route("/site-content", get(public::site_content::list))
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/login",
        post(auth_handlers::login::login).route_layer(from_fn_with_state(
            state.login_limiter.clone(),
            middleware::rate_limit,
        )),
    )
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    let upload_limit = state.uploads.max_bytes() + UPLOAD_BODY_SLACK;

    Router::new()
        // Requirements
        .route("/requirements", get(admin::requirements::list))
        .route("/requirements/:id", get(admin::requirements::get))
        .route("/requirements/:id/status", patch(admin::requirements::update_status))
        .route("/requirements/:id/progress", patch(admin::requirements::update_progress))
        .route(
            "/requirements/:id/notes",
            get(admin::requirements::list_notes).post(admin::requirements::create_note),
        )
        // Case studies
        .route(
            "/case-studies",
            get(admin::case_studies::list).post(admin::case_studies::create),
        )
        .route(
            "/case-studies/:id",
            get(admin::case_studies::get)
                .patch(admin::case_studies::update)
                .delete(admin::case_studies::delete),
        )
        // Site content
        .route(
            "/site-content",
            get(admin::site_content::list).post(admin::site_content::create),
        )
        .route(
            "/site-content/:id",
            patch(admin::site_content::update).delete(admin::site_content::delete),
        )
        // Uploads
        .route(
            "/uploads",
            post(admin::uploads::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route_layer(from_fn_with_state(state.tokens.clone(), middleware::require_bearer))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
