use anyhow::Context;
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tracing::{info, warn};

use crate::cli::commands::database::run_seed;
use crate::config::{AppConfig, Environment};
use crate::database::DatabaseManager;
use crate::state::AppState;

const LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Bootstrap (readiness wait, migrations, seed) and then serve until signalled.
pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    info!(environment = ?config.environment, "Starting consulting API");
    if config.environment == Environment::Production && config.uses_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the development secret");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("database is not reachable")?;
    DatabaseManager::migrate(&pool).await.context("migration failed")?;
    run_seed(&pool, &config).await?;

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| format!("cannot create upload directory {}", config.uploads.dir))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    let state = AppState::new(pool.clone(), config).context("failed to prepare credential checks")?;
    let pruning = state.spawn_limiter_pruning(LIMITER_PRUNE_INTERVAL);
    let app = crate::app(state);

    info!(%addr, "Listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pruning.abort();
    pool.close().await;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
