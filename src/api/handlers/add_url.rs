//! Handler for URL registration endpoint.

use axum::{Json, extract::State};
use tracing::info;
use validator::Validate;

use crate::api::dto::add_url::{AddUrlData, AddUrlRequest, ApiResult};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a URL and returns its short key.
///
/// # Endpoint
///
/// `POST /api/add-url`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "custom_key": "promo"        // optional
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "code": 0,
///   "message": "",
///   "data": {
///     "uri": "/6bx",
///     "key": "6bx",
///     "custom_key": "promo"
///   }
/// }
/// ```
///
/// Registering the same URL again returns the same key.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is not `http(s)://`, or the custom key
/// is malformed, reserved, or already taken by another URL.
/// Returns 500 Internal Server Error on storage failures.
pub async fn add_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<AddUrlRequest>,
) -> Result<Json<ApiResult<AddUrlData>>, AppError> {
    payload.validate()?;

    let shortened = state
        .shorten_service
        .create_or_get_key(&payload.url, payload.custom_key)
        .await?;

    info!(id = shortened.id, key = %shortened.auto_key, "URL registered");

    Ok(Json(ApiResult::ok(AddUrlData {
        uri: state.http.short_uri(&shortened.auto_key),
        key: shortened.auto_key,
        custom_key: shortened.custom_key,
    })))
}
