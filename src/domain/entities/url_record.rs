//! URL record entity: one row per distinct normalized URL.

use chrono::{DateTime, Utc};

/// Lifecycle state of a record.
///
/// A record is created `Pending` and becomes `Keyed` once its auto key is
/// written. The two writes are not atomic, so a crash in between leaves a
/// pending record that is repaired by re-deriving its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pending,
    Keyed,
}

/// A registered URL with its assigned keys.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    pub auto_key: Option<String>,
    pub custom_key: Option<String>,
    /// Reserved; always `0`.
    pub status: i32,
    pub expired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a freshly inserted, pending record.
    pub fn pending(id: i64, url: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            url,
            auto_key: None,
            custom_key: None,
            status: 0,
            expired_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> KeyState {
        if self.auto_key.is_some() {
            KeyState::Keyed
        } else {
            KeyState::Pending
        }
    }

    /// Returns true if `key` is this record's auto or custom key.
    pub fn matches_key(&self, key: &str) -> bool {
        self.auto_key.as_deref() == Some(key) || self.custom_key.as_deref() == Some(key)
    }
}

/// Result of a successful `create_or_get_key` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub id: i64,
    pub url: String,
    pub auto_key: String,
    pub custom_key: Option<String>,
}

/// Record counts reported by the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub total: i64,
    pub pending: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_record() {
        let now = Utc::now();
        let record = UrlRecord::pending(1, "https://example.com".to_string(), now);

        assert_eq!(record.id, 1);
        assert_eq!(record.status, 0);
        assert_eq!(record.state(), KeyState::Pending);
        assert_eq!(record.created_at, now);
        assert!(!record.matches_key("abc"));
    }

    #[test]
    fn test_keyed_record_matches_both_keys() {
        let mut record = UrlRecord::pending(2, "https://example.com".to_string(), Utc::now());
        record.auto_key = Some("cnu".to_string());
        record.custom_key = Some("promo".to_string());

        assert_eq!(record.state(), KeyState::Keyed);
        assert!(record.matches_key("cnu"));
        assert!(record.matches_key("promo"));
        assert!(!record.matches_key("other"));
    }
}
