//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::config::NotFoundPolicy;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its original URL.
///
/// # Endpoint
///
/// `GET {base_path}{key}`
///
/// Auto keys and custom keys are both accepted. A found key answers
/// `301 Moved Permanently`; the mapping never changes once assigned.
///
/// # Unknown Keys
///
/// - [`NotFoundPolicy::Redirect`]: `307 Temporary Redirect` to `/`
/// - [`NotFoundPolicy::Status`]: `404 Not Found` with a JSON error body
///
/// # Errors
///
/// Returns 500 Internal Server Error on storage failures, regardless of policy.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.shorten_service.resolve_key(&key).await {
        Ok(url) => Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, url)]).into_response()),
        Err(AppError::NotFound { .. })
            if state.http.not_found_policy == NotFoundPolicy::Redirect =>
        {
            debug!(key = %key, "unknown key, redirecting to root");
            Ok(Redirect::temporary("/").into_response())
        }
        Err(e) => Err(e),
    }
}
