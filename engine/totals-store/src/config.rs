//! Configuration for the local totals store

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the local JSON-document backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base directory for store documents
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("./data") }
    }
}

impl StoreConfig {
    /// Create a new configuration with a custom data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    /// Directory holding prediction slips, one file per (user, stage)
    pub fn slips_dir(&self) -> PathBuf {
        self.data_dir.join("slips")
    }

    /// Directory holding totals documents, one file per user
    pub fn totals_dir(&self) -> PathBuf {
        self.data_dir.join("totals")
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }
        Ok(())
    }
}
