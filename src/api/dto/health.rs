//! Body of `GET /health`.

use serde::Serialize;

/// Overall status (`healthy` or `degraded`) plus the registry store check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// The URL registry store is the only dependency checked.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    /// Backend error text when the check failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
