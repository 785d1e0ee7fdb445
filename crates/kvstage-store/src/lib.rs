//! # kvstage Store
//!
//! Storage abstraction for kvstage. Provides a trait-based interface for a
//! namespaced key/value map with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! Every pipeline terminates in a [`KeyValueStore`]. The store is untyped: it
//! holds one [`Value`](kvstage_core::Value) per key and knows nothing about the
//! stages in front of it. The persistent implementation is [`SqliteStore`];
//! [`MemoryStore`] has the same semantics without persistence.
//!
//! ## Key Types
//!
//! - [`KeyValueStore`] - The synchronous trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage, one namespace per handle
//! - [`MemoryStore`] - In-memory storage for tests and prototypes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kvstage_store::{KeyValueStore, SqliteStore};
//! use kvstage_core::Value;
//!
//! let store = SqliteStore::open("settings.db", "app").unwrap();
//! store.write("greeting", Value::from("hola")).unwrap();
//! assert_eq!(store.read("greeting").unwrap(), Some(Value::from("hola")));
//! ```
//!
//! ## Design Notes
//!
//! - **Last writer wins**: `write` overwrites; there are no transactions
//! - **Namespaces**: handles over the same file with different namespaces
//!   never observe each other's keys
//! - **Sharing**: the trait is implemented for `&S`, `Box<S>` and `Arc<S>` so
//!   several pipelines can address one store

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KeyValueStore;
