//! File-based journal store.

use super::{JournalStore, StoreError, StoreResult};
use crate::codec;
use crate::recorded::RecordedPath;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of stored journals.
pub const JOURNAL_EXTENSION: &str = "pathlog";

/// Stores each journal as a binary `<id>.pathlog` file in a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_path`.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StoreError::Io(format!("Failed to create store directory: {}", e)))?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the platform data directory.
    ///
    /// On Linux: `~/.local/share/pathlog/journals/`
    pub fn default_location() -> StoreResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("pathlog").join("journals"))
    }

    fn journal_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.{}", safe_id, JOURNAL_EXTENSION))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl JournalStore for FileStore {
    fn save(&self, id: &str, path: &RecordedPath) -> StoreResult<()> {
        let file = self.journal_path(id);
        fs::write(&file, codec::encode(path))
            .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", file.display(), e)))?;
        log::debug!("saved journal {} ({} actions)", id, path.len());
        Ok(())
    }

    fn load(&self, id: &str) -> StoreResult<RecordedPath> {
        let file = self.journal_path(id);
        if !file.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let data = fs::read(&file)
            .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", file.display(), e)))?;
        codec::decode_binary(&data).map_err(|e| {
            log::warn!("journal {} is corrupt: {}", file.display(), e);
            StoreError::Corrupt(e)
        })
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let file = self.journal_path(id);
        if file.exists() {
            fs::remove_file(&file)
                .map_err(|e| StoreError::Io(format!("Failed to delete {}: {}", file.display(), e)))?;
        }
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StoreError::Io(format!("Failed to read directory: {}", e)))?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == JOURNAL_EXTENSION) {
                if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(name.to_string());
                }
            }
        }
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.journal_path(id).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::geometry::{Direction, PathRect};
    use tempfile::tempdir;

    fn sample() -> RecordedPath {
        [
            Action::MoveTo { x: 1.0, y: 1.0 },
            Action::AddRoundedRect { rect: PathRect::new(0.0, 0.0, 8.0, 4.0), rx: 1.0, ry: 1.0, dir: Direction::Cw },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_file_store_save_load() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.save("test-path", &sample()).unwrap();
        assert!(dir.path().join("test-path.pathlog").exists());
        assert_eq!(store.load("test-path").unwrap(), sample());
    }

    #[test]
    fn test_file_store_not_found() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(matches!(store.load("nonexistent"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_file_store_list_ignores_other_files() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.save("path1", &sample()).unwrap();
        store.save("path2", &sample()).unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let list = store.list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&"path1".to_string()));
        assert!(list.contains(&"path2".to_string()));
    }

    #[test]
    fn test_file_store_delete() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.save("test", &sample()).unwrap();
        assert!(store.exists("test").unwrap());
        store.delete("test").unwrap();
        assert!(!store.exists("test").unwrap());
    }

    #[test]
    fn test_file_store_sanitizes_id() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.save("test/path:with*special", &sample()).unwrap();
        assert!(dir.path().join("test_path_with_special.pathlog").exists());
        assert_eq!(store.load("test/path:with*special").unwrap(), sample());
    }

    #[test]
    fn test_file_store_corrupt() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        let mut bytes = codec::encode(&sample()).to_vec();
        bytes.truncate(bytes.len() - 3);
        fs::write(dir.path().join("broken.pathlog"), bytes).unwrap();
        assert!(matches!(store.load("broken"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.base_path(), nested.as_path());
    }
}
