//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  {base_path}{key}` - Short link redirect
//! - `POST /api/add-url`     - JSON registration API
//! - `POST /short`           - Legacy form registration
//! - `GET  /health`          - Health check
//! - `GET  /favicon.ico`     - `{prefix}/public/favicon.ico`
//! - everything else         - Static files from `{prefix}/public`
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, any origin may call the API
//! - **Panic recovery** - A panicking handler answers 500 instead of dropping the connection

use std::path::Path;

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, short_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers; its
///   `base_path` decides where the redirect route is mounted
/// - `static_prefix` - directory whose `public/` subdirectory is served
pub fn app_router(state: AppState, static_prefix: impl AsRef<Path>) -> Router {
    let public_dir = static_prefix.as_ref().join("public");
    let redirect_route = format!("{}{{key}}", state.http.base_path);

    Router::new()
        .route(&redirect_route, get(redirect_handler))
        .route("/health", get(health_handler))
        .route("/short", post(short_handler))
        .nest("/api", api::routes::api_routes())
        .route_service("/favicon.ico", ServeFile::new(public_dir.join("favicon.ico")))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(tracing::layer())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
}
