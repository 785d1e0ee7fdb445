//! Store trait: the abstract interface for key/value persistence.
//!
//! This trait keeps pipelines storage-agnostic. Implementations include
//! SQLite (persistent) and in-memory (tests, prototypes).

use std::sync::Arc;

use kvstage_core::Value;

use crate::error::Result;

/// A namespaced key/value map holding one opaque [`Value`] per key.
///
/// All calls are synchronous and complete before returning.
///
/// # Design Notes
///
/// - **Overwrite**: `write` replaces any prior value for the key.
/// - **Absence**: `read` returns `None` for a key that was never written.
/// - **No typing**: the store does not check what kind of value it holds.
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: Value) -> Result<()>;

    /// Get the most recently written value for `key`.
    fn read(&self, key: &str) -> Result<Option<Value>>;

    /// Remove `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool>;

    /// All keys in this store's namespace, sorted.
    fn keys(&self) -> Result<Vec<String>>;

    /// Check if a key holds a value.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.read(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn write(&self, key: &str, value: Value) -> Result<()> {
        (**self).write(key, value)
    }

    fn read(&self, key: &str) -> Result<Option<Value>> {
        (**self).read(key)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn write(&self, key: &str, value: Value) -> Result<()> {
        (**self).write(key, value)
    }

    fn read(&self, key: &str) -> Result<Option<Value>> {
        (**self).read(key)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn write(&self, key: &str, value: Value) -> Result<()> {
        (**self).write(key, value)
    }

    fn read(&self, key: &str) -> Result<Option<Value>> {
        (**self).read(key)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}
