//! SQLite implementation of the KeyValueStore trait.
//!
//! The persistent backend: values survive process restarts. It uses rusqlite
//! with bundled SQLite. Each handle addresses one namespace; handles created
//! with [`SqliteStore::with_namespace`] share the underlying connection.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use kvstage_core::Value;

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::KeyValueStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    /// The SQLite connection, shared between namespace handles.
    conn: Arc<Mutex<Connection>>,
    /// Namespace every key of this handle lives in.
    namespace: String,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>, namespace: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        let namespace = namespace.into();
        tracing::debug!(path = %path.display(), %namespace, "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            namespace,
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory(namespace: impl Into<String>) -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            namespace: namespace.into(),
        })
    }

    /// A handle to another namespace over the same connection.
    pub fn with_namespace(&self, namespace: impl Into<String>) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            namespace: namespace.into(),
        }
    }

    /// The namespace of this handle.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Execute an operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn: MutexGuard<'_, Connection> = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(format!("mutex poisoned: {}", e)))?;
        f(&conn)
    }
}

// Helper to encode a value to CBOR
fn encode_value(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

// Helper to decode a value from CBOR
fn decode_value(bytes: &[u8]) -> Result<Value> {
    ciborium::from_reader(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

impl KeyValueStore for SqliteStore {
    fn write(&self, key: &str, value: Value) -> Result<()> {
        let encoded = encode_value(&value)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_entries (namespace, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(namespace, key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![self.namespace, key, encoded, now_millis()],
            )?;
            Ok(())
        })?;

        tracing::trace!(namespace = %self.namespace, key, len = value.len(), "sqlite write");
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<Vec<u8>> = self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)
        })?;

        raw.map(|bytes| decode_value(&bytes)).transpose()
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
            )?;
            Ok(removed > 0)
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT key FROM kv_entries WHERE namespace = ?1 ORDER BY key")?;
            let keys = stmt
                .query_map(params![self.namespace], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(keys)
        })
    }

    fn contains(&self, key: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM kv_entries WHERE namespace = ?1 AND key = ?2)",
                params![self.namespace, key],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
