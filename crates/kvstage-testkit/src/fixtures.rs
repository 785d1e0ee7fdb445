//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use bytes::Bytes;
use kvstage::{BoxedStage, Layering, PipelineConfig, Slot};
use kvstage_core::Value;
use kvstage_store::{KeyValueStore, MemoryStore};

/// A test fixture with one shared memory store.
///
/// Chains built from the same fixture address the same store, so they can be
/// used to observe last-writer-wins behavior.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
}

impl TestFixture {
    /// Create a new fixture with an empty store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::with_namespace("testkit")),
        }
    }

    /// Encryption(secret) ∘ Encoding(utf-8) ∘ Slot(key).
    pub fn text_chain(&self, key: &str, secret: &str) -> BoxedStage<String> {
        self.build(PipelineConfig::new(key).encryption_key(secret))
    }

    /// Encoding(utf-8) ∘ Encryption(secret) ∘ Slot(key).
    pub fn reversed_chain(&self, key: &str, secret: &str) -> BoxedStage<String> {
        self.build(
            PipelineConfig::new(key)
                .encryption_key(secret)
                .layering(Layering::EncodeThenEncrypt),
        )
    }

    /// Encoding(utf-8) ∘ Slot(key), no encryption.
    pub fn plain_chain(&self, key: &str) -> BoxedStage<String> {
        self.build(PipelineConfig::new(key))
    }

    /// A raw bytes slot over the fixture store.
    pub fn bytes_slot(&self, key: &str) -> Slot<Arc<MemoryStore>, Bytes> {
        Slot::new(Arc::clone(&self.store), key).expect("fixture keys are non-empty")
    }

    /// Build any config over the fixture store.
    pub fn build(&self, config: PipelineConfig) -> BoxedStage<String> {
        config
            .build(Arc::clone(&self.store))
            .expect("fixture config is valid")
    }

    /// What the store currently holds under `key`.
    pub fn stored(&self, key: &str) -> Option<Value> {
        self.store.read(key).expect("memory store does not fail")
    }

    /// The stored bytes under `key`, panicking on text or absence.
    pub fn stored_bytes(&self, key: &str) -> Bytes {
        match self.stored(key) {
            Some(Value::Bytes(bytes)) => bytes,
            other => panic!("expected bytes under {:?}, found {:?}", key, other),
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
