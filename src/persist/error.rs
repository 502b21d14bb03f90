//! Storage-specific error types.

use std::path::PathBuf;

/// Errors that can occur while reading or writing persisted data.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Key contains characters that can not name a storage slot
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// Failed to read a stored value
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a stored value
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to remove a stored value
    #[error("Failed to remove {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// In-memory storage lock was poisoned
    #[error("Storage lock poisoned")]
    Poisoned,

    /// Failed to serialize persisted data
    #[error("Failed to serialize persisted data: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize persisted data
    #[error("Failed to deserialize persisted data: {0}")]
    DeserializationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let error = StorageError::InvalidKey("../etc".to_string());
        assert!(error.to_string().contains("../etc"));

        let error = StorageError::Poisoned;
        assert!(error.to_string().contains("poisoned"));

        let error = StorageError::SerializationFailed("boom".to_string());
        assert!(error.to_string().contains("serialize"));
        assert!(error.to_string().contains("boom"));

        let error = StorageError::DeserializationFailed("eof".to_string());
        assert!(error.to_string().contains("deserialize"));
    }

    #[test]
    fn test_storage_error_with_path() {
        let error = StorageError::WriteFailed {
            path: PathBuf::from("/data/form-builder-store.json"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("/data/form-builder-store.json"));
        assert!(error_str.contains("disk full"));
    }
}
