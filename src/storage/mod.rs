//! Durable key-value storage and session persistence.
//!
//! A `KeyValueStore` holds UTF-8 text blobs under string keys. `Persistence`
//! keeps two records in a store: the active session and the history list.

mod file;
mod memory;
mod persistence;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistence::Persistence;

use crate::error::StorageError;

/// Synchronous key-value store.
///
/// A completed `set` must be visible to the next `get`; a failed `set`
/// must leave the previous value readable.
pub trait KeyValueStore {
    /// Read the value under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
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
