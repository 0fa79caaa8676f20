//! Handler for the legacy form-based shortening endpoint.

use axum::{Form, Json, extract::State, http::StatusCode};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::warn;

use crate::api::dto::short::{ShortForm, ShortResponse};
use crate::state::AppState;

/// Shortens a base64-encoded long URL.
///
/// # Endpoint
///
/// `POST /short` with `application/x-www-form-urlencoded` body `longUrl=<base64>`
///
/// # Response
///
/// ```json
/// {
///   "Code": 1,
///   "Message": "",
///   "LongUrl": "https://example.com",
///   "ShortUrl": "https://s.example.com/6bx"
/// }
/// ```
///
/// Failures answer 400 with `{ "Code": 0, "Message": "..." }`. Custom keys
/// are not accepted here.
pub async fn short_handler(
    State(state): State<AppState>,
    Form(form): Form<ShortForm>,
) -> (StatusCode, Json<ShortResponse>) {
    let Some(long_url) = decode_long_url(&form.long_url) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ShortResponse::failure("Long URL is required")),
        );
    };

    match state
        .shorten_service
        .create_or_get_key(&long_url, None)
        .await
    {
        Ok(shortened) => (
            StatusCode::OK,
            Json(ShortResponse::success(
                shortened.url,
                state.http.short_url(&shortened.auto_key),
            )),
        ),
        Err(e) => {
            warn!(error = %e, "legacy shorten request failed");
            (
                StatusCode::BAD_REQUEST,
                Json(ShortResponse::failure(e.to_string())),
            )
        }
    }
}

/// Decodes the form value; undecodable or empty input yields `None`.
fn decode_long_url(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;

    (!decoded.is_empty()).then_some(decoded)
}
