//! Shared documentation state for concurrent tool calls.
//!
//! Index mutations update several derived structures in sequence, so every
//! access goes through one reader/writer lock: searches share the index,
//! mutations take it exclusively.

use crate::config::ServerConfig;
use crate::entry::Entry;
use crate::error::IndexError;
use crate::search::{DocIndex, ExportData};
use tokio::sync::{RwLock, RwLockReadGuard};

/// The documentation index plus the limits tools fall back on.
pub struct DocState {
    index: RwLock<DocIndex>,
    limits: ServerConfig,
}

impl std::fmt::Debug for DocState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocState")
            .field("entries", &self.index.try_read().map(|index| index.len()).ok())
            .field("limits", &self.limits)
            .finish()
    }
}

impl DocState {
    pub fn new(index: DocIndex, limits: ServerConfig) -> Self {
        Self {
            index: RwLock::new(index),
            limits,
        }
    }

    pub const fn limits(&self) -> &ServerConfig {
        &self.limits
    }

    /// Shared read access for queries.
    pub async fn read(&self) -> RwLockReadGuard<'_, DocIndex> {
        self.index.read().await
    }

    pub async fn add_entry(&self, entry: Entry) -> Result<(), IndexError> {
        self.index.write().await.add_entry(entry)
    }

    pub async fn remove_entry(&self, id: &str) -> Option<Entry> {
        self.index.write().await.remove_entry(id)
    }

    /// Replace the whole index with an exported snapshot.
    pub async fn import(&self, data: ExportData) -> usize {
        self.index.write().await.import_data(data)
    }

    pub async fn export(&self) -> ExportData {
        self.index.read().await.export_data()
    }
}
