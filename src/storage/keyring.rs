//! OS-keychain-backed durable store.
//!
//! Entries live in the platform keychain under a fixed service name, one
//! keychain item per key. The same `StoredEntry` envelope as the file store
//! carries the TTL, enforced on read.

use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

use super::{DurableStore, StoredEntry};

/// Keychain service name for all entries
const SERVICE_NAME: &str = "authgate";

pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a custom keychain service name (for side-by-side deployments).
    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).context("Failed to create keyring entry")
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DurableStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = self.entry(key)?;
        let raw = match entry.get_password() {
            Ok(raw) => raw,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => {
                return Err(e).context("Failed to read entry from keychain");
            }
        };

        let stored: StoredEntry = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse keychain entry: {}", key))?;

        if stored.is_expired() {
            debug!(key = key, "Evicting expired keychain entry");
            entry
                .delete_credential()
                .context("Failed to evict expired entry from keychain")?;
            return Ok(None);
        }

        Ok(Some(stored.value))
    }

    fn set(&self, key: &str, value: &str, ttl_days: Option<f64>) -> Result<()> {
        let stored = StoredEntry::new(value, ttl_days);
        let raw = serde_json::to_string(&stored)?;
        self.entry(key)?
            .set_password(&raw)
            .context("Failed to store entry in keychain")?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete entry from keychain"),
        }
    }
}
