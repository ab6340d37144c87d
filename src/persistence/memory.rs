//! In-memory store for tests and headless runs

use std::collections::HashMap;

use super::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    /// Reject every write (simulates a full or disabled storage)
    read_only: bool,
    /// Reject reads too (storage blocked by the browser)
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// A store that fails every operation
    pub fn unavailable() -> Self {
        Self {
            read_only: true,
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable(format!("{key}: store is unavailable")));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::WriteRejected(format!("{key}: store is read-only")));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::WriteRejected(format!("{key}: store is read-only")));
        }
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_modes() {
        let mut store = MemoryStore::read_only();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(matches!(store.set("k", "v"), Err(StorageError::WriteRejected(_))));

        let mut store = MemoryStore::unavailable();
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable(_))));
        assert!(store.set("k", "v").is_err());
        assert!(store.remove("k").is_err());
    }
}
