//! In-memory journal store.

use super::{JournalStore, StoreError, StoreResult};
use crate::codec;
use crate::recorded::RecordedPath;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
///
/// Journals are kept encoded so a load goes through the same decoder as a
/// file would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    journals: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `id` without validating them.
    pub fn insert_raw(&self, id: &str, data: impl Into<Bytes>) -> StoreResult<()> {
        let mut journals = self
            .journals
            .write()
            .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
        journals.insert(id.to_string(), data.into());
        Ok(())
    }
}

impl JournalStore for MemoryStore {
    fn save(&self, id: &str, path: &RecordedPath) -> StoreResult<()> {
        self.insert_raw(id, codec::encode(path))
    }

    fn load(&self, id: &str) -> StoreResult<RecordedPath> {
        let journals = self
            .journals
            .read()
            .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
        let data = journals.get(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(codec::decode_binary(data)?)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let mut journals = self
            .journals
            .write()
            .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
        journals.remove(id);
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        let journals = self
            .journals
            .read()
            .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
        Ok(journals.keys().cloned().collect())
    }

    fn exists(&self, id: &str) -> StoreResult<bool> {
        let journals = self
            .journals
            .read()
            .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
        Ok(journals.contains_key(id))
    }
}
