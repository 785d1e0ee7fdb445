//! The stage contract and the stages every chain is built from.
//!
//! A chain is a nest of stages terminating in a [`Slot`]. Each stage owns
//! exactly one inner stage. Writes pass through the outermost stage first;
//! reads come back out in reverse order.

use std::marker::PhantomData;

use bytes::Bytes;
use kvstage_core::{EncryptionKey, StoredValue, TextEncoding, Value};
use kvstage_store::KeyValueStore;

use crate::encoding::EncodingStage;
use crate::encryption::{EncryptionStage, Obfuscate};
use crate::error::{Result, StageError};

/// The read/write contract shared by every stage.
pub trait Stage {
    /// What this stage accepts on `write` and returns from `read`.
    type Payload;

    /// Transform `payload` and pass it to the inner stage.
    fn write(&self, payload: Self::Payload) -> Result<()>;

    /// Read from the inner stage and undo this stage's transform.
    ///
    /// `None` means nothing was ever written to the slot.
    fn read(&self) -> Result<Option<Self::Payload>>;

    /// Layer names, outermost first, ending with the slot.
    fn describe(&self) -> Vec<&'static str>;
}

/// A type-erased stage chain.
pub type BoxedStage<P> = Box<dyn Stage<Payload = P> + Send + Sync>;

impl<T: Stage + ?Sized> Stage for Box<T> {
    type Payload = T::Payload;

    fn write(&self, payload: Self::Payload) -> Result<()> {
        (**self).write(payload)
    }

    fn read(&self) -> Result<Option<Self::Payload>> {
        (**self).read()
    }

    fn describe(&self) -> Vec<&'static str> {
        (**self).describe()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Slot
// ─────────────────────────────────────────────────────────────────────────────

/// The base stage: one store, one fixed key.
///
/// `T` fixes the representation held in the slot. Reading a value of another
/// variant is a [`StageError::Decoding`].
pub struct Slot<S, T = Value> {
    store: S,
    key: String,
    _payload: PhantomData<fn() -> T>,
}

impl<S: KeyValueStore, T: StoredValue> Slot<S, T> {
    /// Bind `store` and `key`.
    ///
    /// Fails with [`StageError::Configuration`] if `key` is empty.
    pub fn new(store: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(StageError::Configuration("slot key must not be empty".into()));
        }
        Ok(Self {
            store,
            key,
            _payload: PhantomData,
        })
    }

    /// The key this slot addresses.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore, T: StoredValue> Stage for Slot<S, T> {
    type Payload = T;

    fn write(&self, payload: T) -> Result<()> {
        let value = payload.into_value();
        tracing::debug!(key = %self.key, kind = %value.kind(), len = value.len(), "slot write");
        self.store.write(&self.key, value)?;
        Ok(())
    }

    fn read(&self) -> Result<Option<T>> {
        let value = self.store.read(&self.key)?;
        tracing::debug!(key = %self.key, found = value.is_some(), "slot read");
        Ok(value.map(T::from_value).transpose()?)
    }

    fn describe(&self) -> Vec<&'static str> {
        vec!["slot"]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Forward
// ─────────────────────────────────────────────────────────────────────────────

/// A stage that passes payloads through unchanged.
pub struct Forward<I> {
    inner: I,
}

impl<I: Stage> Forward<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: Stage> Stage for Forward<I> {
    type Payload = I::Payload;

    fn write(&self, payload: Self::Payload) -> Result<()> {
        self.inner.write(payload)
    }

    fn read(&self) -> Result<Option<Self::Payload>> {
        self.inner.read()
    }

    fn describe(&self) -> Vec<&'static str> {
        let mut layers = vec!["forward"];
        layers.extend(self.inner.describe());
        layers
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Composition helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Fluent wrapping for any stage.
///
/// ```rust
/// use kvstage::{Slot, Stage, StageExt};
/// use kvstage::core::{EncryptionKey, TextEncoding};
/// use kvstage::store::MemoryStore;
/// use bytes::Bytes;
///
/// let store = MemoryStore::new();
/// let chain = Slot::<_, Bytes>::new(&store, "k")
///     .unwrap()
///     .encoded(TextEncoding::Utf8)
///     .encrypted(EncryptionKey::from_secret("secret").unwrap());
///
/// chain.write("hola".to_string()).unwrap();
/// assert_eq!(chain.read().unwrap().as_deref(), Some("hola"));
/// ```
pub trait StageExt: Stage + Sized {
    /// Wrap in a pass-through stage.
    fn forward(self) -> Forward<Self> {
        Forward::new(self)
    }

    /// Wrap in an encoding stage: text on the outside, bytes inside.
    fn encoded(self, encoding: TextEncoding) -> EncodingStage<Self>
    where
        Self: Stage<Payload = Bytes>,
    {
        EncodingStage::new(self, encoding)
    }

    /// Wrap in an XOR encryption stage.
    fn encrypted(self, key: EncryptionKey) -> EncryptionStage<Self>
    where
        Self::Payload: Obfuscate,
    {
        EncryptionStage::new(self, key)
    }

    /// Erase the concrete chain type.
    fn boxed(self) -> BoxedStage<Self::Payload>
    where
        Self: Send + Sync + 'static,
    {
        Box::new(self)
    }
}

impl<T: Stage> StageExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use kvstage_store::MemoryStore;

    #[test]
    fn test_slot_round_trip() {
        let store = MemoryStore::new();
        let slot = Slot::<_, String>::new(&store, "k").unwrap();

        assert_eq!(slot.read().unwrap(), None);
        slot.write("hola".to_string()).unwrap();
        assert_eq!(slot.read().unwrap(), Some("hola".to_string()));
        assert_eq!(store.read("k").unwrap(), Some(Value::from("hola")));
    }

    #[test]
    fn test_slot_rejects_empty_key() {
        let store = MemoryStore::new();
        assert!(matches!(
            Slot::<_, Value>::new(&store, ""),
            Err(StageError::Configuration(_))
        ));
    }

    #[test]
    fn test_slot_type_mismatch_is_decoding_error() {
        let store = MemoryStore::new();
        store.write("k", Value::from("text")).unwrap();

        let slot = Slot::<_, Bytes>::new(&store, "k").unwrap();
        assert!(matches!(slot.read(), Err(StageError::Decoding(_))));
    }

    #[test]
    fn test_forward_is_transparent() {
        let store = MemoryStore::new();
        let chain = Slot::<_, Bytes>::new(&store, "k").unwrap().forward();

        chain.write(Bytes::from_static(b"raw")).unwrap();

        assert_eq!(chain.read().unwrap(), Some(Bytes::from_static(b"raw")));
        assert_eq!(store.read("k").unwrap(), Some(Value::from(b"raw".to_vec())));
        assert_eq!(chain.describe(), vec!["forward", "slot"]);
        assert_eq!(chain.inner().key(), "k");
    }

    #[test]
    fn test_boxed_stage_delegates() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let chain: BoxedStage<Value> = Slot::<_, Value>::new(store.clone(), "k").unwrap().boxed();

        chain.write(Value::from("v")).unwrap();
        assert_eq!(chain.read().unwrap(), Some(Value::from("v")));
        assert_eq!(chain.describe(), vec!["slot"]);
    }
}
