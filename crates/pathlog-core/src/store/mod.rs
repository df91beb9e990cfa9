//! Persistence of recorded paths.
//!
//! Stores hold the binary encoding of a [`RecordedPath`] under a string id.

mod file;
mod memory;

pub use file::{FileStore, JOURNAL_EXTENSION};
pub use memory::MemoryStore;

use crate::error::DecodeError;
use crate::recorded::RecordedPath;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Journal not found: {0}")]
    NotFound(String),
    #[error("Corrupt journal: {0}")]
    Corrupt(#[from] DecodeError),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for journal storage backends.
pub trait JournalStore: Send + Sync {
    /// Save a journal, replacing any previous one with the same id.
    fn save(&self, id: &str, path: &RecordedPath) -> StoreResult<()>;

    /// Load and decode a journal.
    fn load(&self, id: &str) -> StoreResult<RecordedPath>;

    /// Delete a journal. Deleting a missing id is not an error.
    fn delete(&self, id: &str) -> StoreResult<()>;

    /// List all journal ids.
    fn list(&self) -> StoreResult<Vec<String>>;

    /// Check if a journal exists.
    fn exists(&self, id: &str) -> StoreResult<bool>;
}
