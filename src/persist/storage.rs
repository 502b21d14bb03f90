//! Key-value storage backends.
//!
//! The `Storage` trait mirrors browser local storage: string values stored
//! under string keys, with reads that may find nothing.

use super::StorageError;
use log::*;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// Storage shared between the store's persister and background savers.
pub type SharedStorage = Arc<dyn Storage + Send + Sync>;

pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

fn check_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Stores each key as `<key>.json` inside a directory.
///
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> FileStorage {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        check_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::ReadFailed { path, source })
    }

    /// Write through a temporary file in the same directory, then rename it
    /// over the target so a reader never sees a partial value. The temporary
    /// file is removed if any step fails.
    ///
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::WriteFailed {
            path: self.dir.clone(),
            source,
        })?;
        let write = || -> std::io::Result<()> {
            let mut file = NamedTempFile::new_in(&self.dir)?;
            file.write_all(value.as_bytes())?;
            file.flush()?;
            file.persist(&path).map_err(|e| e.error)?;
            Ok(())
        };
        write().map_err(|source| StorageError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        trace!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::RemoveFailed { path, source }),
        }
    }
}

/// Process-local storage, mainly for tests.
///
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Storage that keeps nothing. Reads always come back empty.
///
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStorage;

impl Storage for NoopStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get_item("form-builder-store").unwrap(), None);
        storage.set_item("form-builder-store", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get_item("form-builder-store").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(dir.path().join("form-builder-store.json").exists());
        assert_eq!(entries(dir.path()), vec!["form-builder-store.json"]);
        storage.set_item("form-builder-store", "{}").unwrap();
        assert_eq!(storage.get_item("form-builder-store").unwrap().as_deref(), Some("{}"));
        storage.remove_item("form-builder-store").unwrap();
        assert_eq!(storage.get_item("form-builder-store").unwrap(), None);
        storage.remove_item("form-builder-store").unwrap();
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        for key in ["../escape", "a/b", "", ".hidden"] {
            assert!(matches!(
                storage.set_item(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn file_storage_reports_unreadable_value() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("broken.json")).unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.get_item("broken"),
            Err(StorageError::ReadFailed { .. })
        ));
    }

    #[test]
    fn failed_file_write_leaves_no_temporary_file() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("blocked.json").join("inner")).unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.set_item("blocked", "{}"),
            Err(StorageError::WriteFailed { .. })
        ));
        assert_eq!(entries(dir.path()), vec!["blocked.json"]);
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        assert_eq!(storage.len(), 1);
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn noop_storage_forgets_everything() {
        let storage = NoopStorage;
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }
}
