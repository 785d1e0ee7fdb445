//! In-memory implementation of the KeyValueStore trait.
//!
//! Same semantics as SQLite but keeps everything in memory with no
//! persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use kvstage_core::Value;

use crate::error::{Result, StoreError};
use crate::traits::KeyValueStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    namespace: String,
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create a new empty store in the default namespace.
    pub fn new() -> Self {
        Self::with_namespace("default")
    }

    /// Create a new empty store labelled with `namespace`.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The namespace label.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.entries()?.is_empty())
    }

    fn entries(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Value>>> {
        self.entries
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn entries_mut(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Value>>> {
        self.entries
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn write(&self, key: &str, value: Value) -> Result<()> {
        tracing::trace!(namespace = %self.namespace, key, len = value.len(), "memory write");
        self.entries_mut()?.insert(key.to_owned(), value);
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries_mut()?.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::new();

        assert_eq!(store.read("k").unwrap(), None);
        store.write("k", Value::from("hola")).unwrap();
        assert_eq!(store.read("k").unwrap(), Some(Value::from("hola")));
        assert!(store.contains("k").unwrap());
    }

    #[test]
    fn test_memory_store_overwrite() {
        let store = MemoryStore::new();

        store.write("k", Value::from("first")).unwrap();
        store.write("k", Value::from(vec![1u8, 2])).unwrap();

        assert_eq!(store.read("k").unwrap(), Some(Value::from(vec![1u8, 2])));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_memory_store_remove_and_keys() {
        let store = MemoryStore::with_namespace("prefs");
        store.write("b", Value::from("2")).unwrap();
        store.write("a", Value::from("1")).unwrap();

        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert_eq!(store.keys().unwrap(), vec!["b".to_string()]);
        assert_eq!(store.namespace(), "prefs");
    }

    #[test]
    fn test_shared_handles_see_same_data() {
        let store = Arc::new(MemoryStore::new());
        let a = Arc::clone(&store);
        let b = &store;

        a.write("k", Value::from("first")).unwrap();
        b.write("k", Value::from("second")).unwrap();

        assert_eq!(store.read("k").unwrap(), Some(Value::from("second")));
    }
}
