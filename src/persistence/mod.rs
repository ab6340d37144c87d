//! Local persistence
//!
//! Features:
//! - `KeyValueStore` abstraction over LocalStorage / files / memory
//! - JSON helpers for typed values
//! - Best score counter
//!
//! A failing store never takes the game down: callers treat errors as
//! "not saved" and carry on.

pub mod best_score;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod memory;

pub use best_score::BestScore;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write rejected: {0}")]
    WriteRejected(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value store that survives restarts
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Read and decode a JSON value
pub fn load_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip_and_missing_key() {
        let mut store = MemoryStore::new();
        assert_eq!(load_json::<Vec<u32>>(&store, "k").unwrap(), None);

        save_json(&mut store, "k", &vec![3u32, 1, 2]).unwrap();
        assert_eq!(load_json::<Vec<u32>>(&store, "k").unwrap(), Some(vec![3, 1, 2]));
    }

    #[test]
    fn test_corrupt_json_is_an_error() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        assert!(matches!(load_json::<Vec<u32>>(&store, "k"), Err(StorageError::Json(_))));
    }
}
