use jfs_types::Named;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::store::FileStore;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub name: String,
    pub size: u32,
    #[serde(default)]
    pub color: Option<String>,
}

impl Widget {
    pub fn new(name: &str, size: u32) -> Self {
        Self {
            name: name.to_string(),
            size,
            color: None,
        }
    }
}

impl Named for Widget {
    fn name(&self) -> &str {
        &self.name
    }
}

pub fn temp_store() -> (tempfile::TempDir, FileStore<Widget>) {
    temp_store_with(|c| c)
}

pub fn temp_store_with(
    tweak: impl FnOnce(StoreConfig) -> StoreConfig,
) -> (tempfile::TempDir, FileStore<Widget>) {
    let dir = tempfile::tempdir().unwrap();
    let config = tweak(StoreConfig::new(dir.path().join("widgets")));
    let store = FileStore::open(config).unwrap();
    (dir, store)
}
