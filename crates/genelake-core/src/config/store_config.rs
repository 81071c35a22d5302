//! Store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Connection settings for the SQLite store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file path. Default: `datalake.db`.
    pub database_path: Option<String>,
    /// Read connections kept for query access. Default: 4.
    pub read_pool_size: Option<usize>,
}

impl StoreConfig {
    /// Returns the effective database path, defaulting to `datalake.db`.
    pub fn effective_database_path(&self) -> PathBuf {
        PathBuf::from(self.database_path.as_deref().unwrap_or("datalake.db"))
    }

    /// Returns the effective read pool size, defaulting to 4.
    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.unwrap_or(4)
    }
}
