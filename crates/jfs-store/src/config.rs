use std::path::PathBuf;

use jfs_watch::{DEFAULT_CAPACITY, MAX_CAPACITY};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Flush strategy for object files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` the object file and its directory on every write.
    EveryWrite,
    /// Rely on the OS page cache. Writes are still atomic renames.
    #[default]
    OsDefault,
}

/// Configuration for a file store.
///
/// ```toml
/// root = "/var/lib/jfs/widgets"
/// sync_mode = "every_write"
/// watch_capacity = 128
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory the store owns. Created on open.
    pub root: PathBuf,
    pub sync_mode: SyncMode,
    /// Minimum number of live events a watch subscriber can fall behind by
    /// before it starts losing the oldest ones. Queues are rounded up to a
    /// power of two, so the real headroom may be larger. At most
    /// `MAX_CAPACITY`.
    pub watch_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            sync_mode: SyncMode::default(),
            watch_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }

    pub fn with_watch_capacity(mut self, watch_capacity: usize) -> Self {
        self.watch_capacity = watch_capacity;
        self
    }

    /// Parse and validate a TOML document. Missing fields take defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.root.as_os_str().is_empty() {
            return Err(StoreError::Config("root must not be empty".into()));
        }
        if self.watch_capacity == 0 {
            return Err(StoreError::Config("watch_capacity must be positive".into()));
        }
        if self.watch_capacity > MAX_CAPACITY {
            return Err(StoreError::Config(format!(
                "watch_capacity must be at most {MAX_CAPACITY}"
            )));
        }
        Ok(())
    }
}
