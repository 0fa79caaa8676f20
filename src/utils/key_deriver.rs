//! Short key derivation and custom key validation.
//!
//! Auto keys are a pure function of a record's id and URL, so a key lost to an
//! interrupted write can always be recomputed. The id occupies the low bits of
//! the encoded number and the SHA-256 bits above it scramble the visible
//! sequence.
//!
//! Keys of two records with the same URL hash prefix never collide. Across
//! different URLs a collision is possible (an id of one bit length plus its
//! content bits can equal another id of a longer bit length); the unique
//! constraint on `auto_key` rejects such a write and the record stays pending.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

/// Maximum length of a stored key, matching the `auto_key`/`custom_key` columns.
pub const MAX_KEY_LENGTH: usize = 64;

/// Route segments a custom key must not shadow.
const RESERVED_KEYS: &[&str] = &["api", "health", "short"];

/// Allowed custom key characters.
static CUSTOM_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Derives the auto key for a record.
///
/// # Algorithm
///
/// 1. `digest = SHA-256(url)`
/// 2. `sum_key = (digest[0] << 8) + digest[1]`
/// 3. `shift` = number of bits needed to represent `id`
/// 4. `combined = id | (sum_key << shift)`
/// 5. base-36 encode `combined`, lowercase, unpadded
///
/// # Examples
///
/// ```ignore
/// assert_eq!(derive_key(1, "https://example.com"), "6bx");
/// assert_eq!(derive_key(2, "https://example.com"), "cnu");
/// ```
pub fn derive_key(id: u64, url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let sum_key = u16::from_be_bytes([digest[0], digest[1]]);

    compose_key(id, sum_key)
}

/// Combines an id with content bits and encodes the result.
///
/// Computed in 128 bits: a 16-bit `sum_key` shifted past a 64-bit id never
/// loses bits.
fn compose_key(id: u64, sum_key: u16) -> String {
    let shift = u64::BITS - id.leading_zeros();
    let combined = u128::from(id) | (u128::from(sum_key) << shift);

    to_base36(combined)
}

fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(25);
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    String::from_utf8(digits).unwrap_or_default()
}

/// Normalizes an optional caller-supplied custom key.
///
/// Surrounding whitespace is trimmed and an empty key counts as absent.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn normalize_custom_key(custom_key: Option<String>) -> Result<Option<String>, AppError> {
    let Some(raw) = custom_key else {
        return Ok(None);
    };

    let key = raw.trim();
    if key.is_empty() {
        return Ok(None);
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(AppError::bad_request(
            format!("Custom key must be at most {MAX_KEY_LENGTH} characters"),
            json!({ "provided_length": key.len() }),
        ));
    }

    if !CUSTOM_KEY_REGEX.is_match(key) {
        return Err(AppError::bad_request(
            "Custom key can only contain letters, digits, hyphens and underscores",
            json!({ "custom_key": key }),
        ));
    }

    if RESERVED_KEYS.contains(&key) {
        return Err(AppError::bad_request(
            "This key is reserved",
            json!({ "custom_key": key }),
        ));
    }

    Ok(Some(key.to_string()))
}
