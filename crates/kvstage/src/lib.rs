//! # kvstage
//!
//! Composable stages over a key/value store: the Decorator pattern as a
//! read/write pipeline.
//!
//! ## Overview
//!
//! A pipeline is a nest of [`Stage`]s ending in a [`Slot`], which binds one
//! key of a [`KeyValueStore`](kvstage_store::KeyValueStore). Every stage owns
//! the stage it wraps and exposes the same `write`/`read` contract:
//!
//! - [`Slot`] - base stage, one store and one fixed key
//! - [`Forward`] - passes payloads through unchanged
//! - [`EncodingStage`] - text outside, encoded bytes inside
//! - [`EncryptionStage`] - repeating-key XOR over text or bytes
//!
//! Writes flow from the outermost stage inward; reads flow back out. Payload
//! types are checked at each boundary at compile time.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use kvstage::{PipelineConfig, Stage};
//! use kvstage::store::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let pipeline = PipelineConfig::new("k")
//!     .encryption_key("secret")
//!     .build(store.clone())
//!     .unwrap();
//!
//! pipeline.write("hola".to_string()).unwrap();
//! assert_eq!(pipeline.read().unwrap().as_deref(), Some("hola"));
//! ```
//!
//! ## Design Notes
//!
//! - **Composition, not inheritance**: one trait, a closed set of stages
//! - **Immutable stages**: wrapped stage and key are fixed at construction
//! - **No integrity**: a wrong XOR key yields a different value, not an error
//! - **Last writer wins**: chains sharing a store and key overwrite each other
//!
//! ## Re-exports
//!
//! - `kvstage::core` - payload model, encodings, keys
//! - `kvstage::store` - store trait and backends

pub mod config;
pub mod encoding;
pub mod encryption;
pub mod error;
pub mod stage;

// Re-export component crates
pub use kvstage_core as core;
pub use kvstage_store as store;

pub use config::{Layering, PipelineConfig};
pub use encoding::EncodingStage;
pub use encryption::{EncryptionStage, Obfuscate};
pub use error::{Result, StageError};
pub use stage::{BoxedStage, Forward, Slot, Stage, StageExt};

// Re-export commonly used core types
pub use kvstage_core::{EncryptionKey, TextEncoding, Value};
pub use kvstage_store::{KeyValueStore, MemoryStore, SqliteStore};
