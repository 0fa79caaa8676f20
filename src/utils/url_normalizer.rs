//! URL normalization used as the deduplication key of the registry.
//!
//! Normalization is shallow: the submitted text is trimmed and
//! checked against a whitelist of scheme prefixes, nothing else is rewritten.
//! Two submissions map to the same record only when their trimmed text is
//! byte-for-byte identical.

/// Scheme prefixes accepted by the registry (case-sensitive).
pub const SUPPORTED_PREFIXES: &[&str] = &["https://", "http://"];

/// Maximum stored URL length, matching the `url` column.
pub const MAX_URL_LENGTH: usize = 4096;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("Only URLs starting with http:// or https:// are supported")]
    UnsupportedScheme,

    #[error("URL has nothing after the scheme")]
    MissingTarget,

    #[error("URL is longer than {MAX_URL_LENGTH} bytes")]
    TooLong,
}

/// Normalizes a submitted URL.
///
/// # Rules
///
/// 1. Leading and trailing whitespace and control characters are stripped
/// 2. The result must start with `http://` or `https://` (exact, case-sensitive)
/// 3. Something must follow the scheme prefix
/// 4. The result must fit in [`MAX_URL_LENGTH`] bytes
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("  https://example.com\n").unwrap(), "https://example.com");
/// assert!(normalize_url("HTTPS://example.com").is_err());
/// assert!(normalize_url("ftp://example.com").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim_matches(|c: char| c.is_whitespace() || c.is_control());

    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let prefix = SUPPORTED_PREFIXES
        .iter()
        .find(|prefix| trimmed.starts_with(**prefix))
        .ok_or(UrlNormalizationError::UnsupportedScheme)?;

    if trimmed.len() == prefix.len() {
        return Err(UrlNormalizationError::MissingTarget);
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong);
    }

    Ok(trimmed.to_string())
}
