use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;

use crate::auth::{self, AuthError, TokenService};
use crate::config::AppConfig;
use crate::middleware::rate_limit::{self, RouteLimiter};
use crate::services::UploadService;

/// Shared handles injected into every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub uploads: UploadService,
    pub requirement_limiter: RouteLimiter,
    pub login_limiter: RouteLimiter,
    /// bcrypt hash checked on logins for unknown emails
    pub login_decoy: Arc<str>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Result<Self, AuthError> {
        let login_decoy = auth::decoy_hash(config.security.bcrypt_cost)?;
        let limits = &config.rate_limit;
        Ok(Self {
            tokens: TokenService::from_config(&config.security),
            uploads: UploadService::from_config(&config.uploads),
            requirement_limiter: RouteLimiter::per_minute(limits.requirements_per_minute, limits.enabled),
            login_limiter: RouteLimiter::per_minute(limits.login_per_minute, limits.enabled),
            login_decoy: login_decoy.into(),
            config: Arc::new(config),
            pool,
        })
    }

    /// Background task that keeps the per-IP counter maps bounded
    pub fn spawn_limiter_pruning(&self, every: Duration) -> JoinHandle<()> {
        rate_limit::spawn_pruning(
            vec![self.requirement_limiter.clone(), self.login_limiter.clone()],
            every,
        )
    }
}
