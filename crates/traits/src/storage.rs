//! Storage trait for abstracting persistence of project data.
//!
//! This trait lets the editor save and restore its state without being tied
//! to `localStorage`, IndexedDB or a filesystem.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage is not available: {0}")]
    Unavailable(String),

    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("Storage quota exceeded while writing '{0}'")]
    QuotaExceeded(String),
}

/// A string key/value store.
///
/// # Implementations
///
/// - `LocalStorage` (in `livepen-wasm`): the browser's `window.localStorage`
/// - [`InMemoryStorage`]: a map held in memory (always available)
///
/// # Example
///
/// ```ignore
/// let storage = InMemoryStorage::new();
/// storage.save("livepen_editor", "{}")?;
/// assert_eq!(storage.load("livepen_editor")?.as_deref(), Some("{}"));
/// ```
pub trait Storage: Debug {
    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Load the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored under the key.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Returns a human-readable name for this store (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory store.
///
/// Values live only as long as the store itself. Useful for tests and for
/// hosts without persistent storage.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored keys.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the store is empty.
    ///
    /// Returns `true` if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl Storage for InMemoryStorage {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::WriteFailed {
                key: key.to_string(),
                message: "storage lock poisoned".to_string(),
            })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::ReadFailed {
            key: key.to_string(),
            message: "storage lock poisoned".to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::WriteFailed {
                key: key.to_string(),
                message: "storage lock poisoned".to_string(),
            })?;
        entries.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "InMemoryStorage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_storage_save_and_load() {
        let storage = InMemoryStorage::new();
        storage.save("key", "value").unwrap();

        assert_eq!(storage.load("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_in_memory_storage_missing_key() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.load("missing").unwrap(), None);
    }

    #[test]
    fn test_in_memory_storage_overwrite() {
        let storage = InMemoryStorage::new();
        storage.save("key", "original").unwrap();
        storage.save("key", "updated").unwrap();

        assert_eq!(storage.load("key").unwrap().as_deref(), Some("updated"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_in_memory_storage_remove() {
        let storage = InMemoryStorage::new();
        storage.save("key", "value").unwrap();
        storage.remove("key").unwrap();

        assert!(storage.is_empty());
        // Removing again is fine
        storage.remove("key").unwrap();
    }

    #[test]
    fn test_in_memory_storage_empty_value() {
        let storage = InMemoryStorage::new();
        storage.save("blank", "").unwrap();
        assert_eq!(storage.load("blank").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::WriteFailed {
            key: "livepen_editor".to_string(),
            message: "denied".to_string(),
        };
        assert!(err.to_string().contains("livepen_editor"));
        assert!(err.to_string().contains("denied"));

        let err = StorageError::QuotaExceeded("big".to_string());
        assert!(err.to_string().contains("big"));
    }

    #[test]
    fn test_in_memory_storage_name() {
        assert_eq!(InMemoryStorage::new().name(), "InMemoryStorage");
    }
}
