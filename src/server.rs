//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, schema bootstrap, pending-record repair and
//! the Axum server lifecycle.

use crate::application::services::ShortenService;
use crate::config::Config;
use crate::infrastructure::database;
use crate::infrastructure::persistence::PgUrlRepository;
use crate::routes::app_router;
use crate::state::{AppState, HttpSettings};

use anyhow::{Context, Result};
use std::sync::Arc;

/// Upper bound on records keyed by the startup repair pass.
const STARTUP_REPAIR_LIMIT: i64 = 10_000;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Repair of records left without keys (if enabled)
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = database::connect(&config).await?;
    database::migrate(&pool).await?;

    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    let shorten_service = Arc::new(ShortenService::new(
        repository,
        config.key_policy,
        config.conflict_retries,
    ));

    if config.repair_on_startup {
        match shorten_service.repair_pending(STARTUP_REPAIR_LIMIT).await {
            Ok(0) => tracing::debug!("No pending records"),
            Ok(repaired) => tracing::info!(repaired, "Keyed pending records"),
            Err(e) => tracing::warn!("Startup repair failed: {}", e),
        }
    }

    let state = AppState::new(shorten_service, HttpSettings::from_config(&config));

    let app = app_router(state, &config.static_prefix);

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
