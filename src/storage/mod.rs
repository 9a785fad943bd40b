//! Storage tiers for credential persistence.
//!
//! Two seams with different durability semantics:
//! - `DurableStore`: small opaque string entries with an optional TTL,
//!   surviving process restarts (file- or keychain-backed)
//! - `EphemeralStore`: structured session-scoped values, gone when the
//!   session scope ends
//!
//! Both are injected into the credential manager so tests can substitute
//! in-memory implementations.

pub mod file;
pub mod keyring;
pub mod memory;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use file::FileStore;
pub use keyring::KeyringStore;
pub use memory::MemoryStore;

/// Durable tier: capped, opaque string values keyed by name, with optional
/// expiry. Expired entries are evicted on read rather than by a background
/// sweeper.
pub trait DurableStore: Send + Sync {
    /// Read an entry, returning `None` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write an entry. `ttl_days` may be fractional; a non-positive value
    /// produces an entry that is already expired and will be evicted on the
    /// next read.
    fn set(&self, key: &str, value: &str, ttl_days: Option<f64>) -> Result<()>;

    /// Delete an entry. Deleting a missing entry is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Ephemeral tier: structured values scoped to the current session.
pub trait EphemeralStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<serde_json::Value>;

    fn set_item(&self, key: &str, value: serde_json::Value);

    fn remove_item(&self, key: &str);

    /// Wipe the entire session scope, not just a single key.
    fn clear(&self);
}

/// Envelope persisted by the durable backends: the opaque value plus the
/// absolute deadline derived from the caller's TTL at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredEntry {
    pub(crate) value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

/// Milliseconds per day, for fractional-day TTL arithmetic.
const MS_PER_DAY: f64 = 86_400_000.0;

impl StoredEntry {
    pub(crate) fn new(value: impl Into<String>, ttl_days: Option<f64>) -> Self {
        let expires_at =
            ttl_days.map(|days| Utc::now() + Duration::milliseconds((days * MS_PER_DAY) as i64));
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Utc::now() > deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = StoredEntry::new("value", None);
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_with_future_ttl_is_live() {
        // Half a day out
        let entry = StoredEntry::new("value", Some(0.5));
        assert!(!entry.is_expired());

        let deadline = entry.expires_at.expect("deadline should be set");
        let remaining = deadline - Utc::now();
        assert!(remaining.num_hours() >= 11);
        assert!(remaining.num_hours() <= 12);
    }

    #[test]
    fn test_entry_with_non_positive_ttl_is_expired() {
        assert!(StoredEntry::new("value", Some(-1.0)).is_expired());

        // A zero TTL lands exactly on "now"; give the clock one tick
        let zero = StoredEntry::new("value", Some(0.0));
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(zero.is_expired());
    }

    #[test]
    fn test_entry_roundtrips_through_json() {
        let entry = StoredEntry::new("opaque", Some(1.5));
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: StoredEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.value, "opaque");
        assert_eq!(parsed.expires_at, entry.expires_at);
    }
}
