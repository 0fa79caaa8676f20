//! Application error taxonomy and HTTP mapping.
//!
//! Every fallible operation in the crate returns [`AppError`]. Storage-level
//! failures are converted through the `From<sqlx::Error>` impl, which tells the
//! expected uniqueness races apart from genuine backend failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Unique constraint guarding one record per normalized URL.
pub const URL_UNIQUE_CONSTRAINT: &str = "urls_url_unique";

/// Unique constraint guarding auto keys.
pub const AUTO_KEY_UNIQUE_CONSTRAINT: &str = "urls_auto_key_unique";

/// Unique constraint guarding custom keys.
pub const CUSTOM_KEY_UNIQUE_CONSTRAINT: &str = "urls_custom_key_unique";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to HTTP clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input rejected before touching storage (bad URL, bad or taken custom key).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// No record matches the requested key.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A concurrent writer won a uniqueness race.
    ///
    /// Internal only: the registry retries on it and never returns it.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Backend unavailable or an unexpected constraint violation.
    #[error("{message}")]
    Storage { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Maps a violated unique constraint to the error the core expects.
    pub fn from_unique_violation(constraint: Option<&str>) -> Self {
        match constraint {
            Some(URL_UNIQUE_CONSTRAINT) => AppError::conflict(
                "URL was registered concurrently",
                json!({ "constraint": URL_UNIQUE_CONSTRAINT }),
            ),
            Some(CUSTOM_KEY_UNIQUE_CONSTRAINT) => AppError::bad_request(
                "Custom key is already in use",
                json!({ "constraint": CUSTOM_KEY_UNIQUE_CONSTRAINT }),
            ),
            Some(AUTO_KEY_UNIQUE_CONSTRAINT) => {
                // Two (id, url) pairs encoded to the same number; the record stays pending.
                tracing::error!("derived auto key collides with another record");
                AppError::storage(
                    "Storage error",
                    json!({ "constraint": AUTO_KEY_UNIQUE_CONSTRAINT }),
                )
            }
            other => {
                tracing::error!(constraint = ?other, "unexpected unique constraint violation");
                AppError::storage("Storage error", json!({}))
            }
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Storage { message, details } => ("storage_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::from_unique_violation(db.constraint());
        }

        tracing::error!(error = %e, "database error");
        AppError::storage("Storage error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request("Request validation failed", json!(errors))
    }
}
