use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::core::errors::{LedgerError, Result};

use super::{Collection, StorageBackend};

/// In-process backend. Clones share the same underlying map, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<Collection, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text for a collection.
    pub fn raw(&self, collection: Collection) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(&collection).cloned())
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, collection: Collection) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::Storage("memory storage lock poisoned".into()))?;
        Ok(entries.get(&collection).cloned())
    }

    fn write(&self, collection: Collection, contents: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::Storage("memory storage lock poisoned".into()))?;
        entries.insert(collection, contents.to_string());
        Ok(())
    }
}
