//! In-memory store implementing both tiers.
//!
//! The natural ephemeral (session-scoped) backend for a single process, and
//! the substitute for either tier in tests. All state is gone when the store
//! is dropped.

use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;
use serde_json::Value;

use super::{DurableStore, EphemeralStore, StoredEntry};

#[derive(Default)]
pub struct MemoryStore {
    durable: RwLock<HashMap<String, StoredEntry>>,
    session: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut map = self.durable.write();
        if map.get(key).is_some_and(|entry| entry.is_expired()) {
            map.remove(key);
            return Ok(None);
        }
        Ok(map.get(key).map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: &str, ttl_days: Option<f64>) -> Result<()> {
        self.durable
            .write()
            .insert(key.to_string(), StoredEntry::new(value, ttl_days));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.durable.write().remove(key);
        Ok(())
    }
}

impl EphemeralStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<Value> {
        self.session.read().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: Value) {
        self.session.write().insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        self.session.write().remove(key);
    }

    fn clear(&self) {
        self.session.write().clear();
    }
}
