//! File-backed durable store.
//!
//! One JSON file per key under a storage directory, each holding a
//! `StoredEntry` envelope. Expired entries are removed when read.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::APP_NAME;

use super::{DurableStore, StoredEntry};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Default storage location under the platform cache directory.
    pub fn default_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store entry: {}", key))?;
        let entry: StoredEntry = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store entry: {}", key))?;

        if entry.is_expired() {
            debug!(key = key, "Evicting expired store entry");
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to evict expired store entry: {}", key))?;
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    fn set(&self, key: &str, value: &str, ttl_days: Option<f64>) -> Result<()> {
        let entry = StoredEntry::new(value, ttl_days);
        let contents = serde_json::to_string_pretty(&entry)?;
        std::fs::write(self.entry_path(key), contents)
            .with_context(|| format!("Failed to write store entry: {}", key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove store entry: {}", key))?;
        }
        Ok(())
    }
}
