//! API route configuration.

use crate::api::handlers::add_url_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /add-url` - Register a URL, optionally with a custom key
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/add-url", post(add_url_handler))
}
