//! Library configuration management.
//!
//! This module handles loading and saving the configuration, which includes
//! the authority base URL, the request timeout, and an optional override for
//! the durable storage directory.
//!
//! Configuration is stored at `~/.config/authgate/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
pub(crate) const APP_NAME: &str = "authgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default authority base URL
const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// HTTP request timeout in seconds.
/// 30s allows for slow authority responses while failing fast enough for
/// good UX.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Override for the durable store location; platform cache dir when unset
    pub storage_dir: Option<PathBuf>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage_dir: None,
        }
    }
}

impl AuthConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the durable store directory
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::storage::FileStore::default_dir(),
        }
    }
}
