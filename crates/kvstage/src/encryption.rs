//! Encryption stage: repeating-key XOR over the inner payload.
//!
//! Byte `i` of the payload is combined with `key[i % key.len()]`, `i` being
//! the input position. Applying the same key twice restores the input.
//!
//! This is obfuscation, not encryption in the cryptographic sense. There is no
//! integrity check: reading with the wrong key returns a different value
//! rather than an error.

use bytes::Bytes;
use kvstage_core::{CoreError, EncryptionKey};

use crate::error::Result;
use crate::stage::Stage;

/// A payload representation the encryption stage can transform.
pub trait Obfuscate: Sized {
    /// Apply the key on the write path.
    fn obfuscate(self, key: &EncryptionKey) -> Self;

    /// Undo [`Obfuscate::obfuscate`] on the read path.
    fn reveal(self, key: &EncryptionKey) -> Result<Self>;
}

impl Obfuscate for Bytes {
    fn obfuscate(self, key: &EncryptionKey) -> Self {
        Bytes::from(key.apply(&self))
    }

    fn reveal(self, key: &EncryptionKey) -> Result<Self> {
        Ok(Bytes::from(key.apply(&self)))
    }
}

/// Text is XORed over its UTF-8 bytes, and the result is carried as lowercase
/// hex so it stays valid text for the inner stage.
impl Obfuscate for String {
    fn obfuscate(self, key: &EncryptionKey) -> Self {
        hex::encode(key.apply(self.as_bytes()))
    }

    fn reveal(self, key: &EncryptionKey) -> Result<Self> {
        let masked = hex::decode(&self)
            .map_err(|e| CoreError::Decoding(format!("obfuscated text is not hex: {e}")))?;

        match String::from_utf8(key.apply(&masked)) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(
                    key = %key.fingerprint(),
                    "revealed payload is not utf-8; the key probably does not match"
                );
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }
}

/// XOR-obfuscates payloads with a fixed, non-empty key.
pub struct EncryptionStage<I> {
    inner: I,
    key: EncryptionKey,
}

impl<I> EncryptionStage<I>
where
    I: Stage,
    I::Payload: Obfuscate,
{
    pub fn new(inner: I, key: EncryptionKey) -> Self {
        Self { inner, key }
    }

    /// Build from a text secret.
    ///
    /// Fails with [`StageError::Configuration`](crate::StageError::Configuration)
    /// if `secret` is empty.
    pub fn with_secret(inner: I, secret: &str) -> Result<Self> {
        Ok(Self::new(inner, EncryptionKey::from_secret(secret)?))
    }

    pub fn key(&self) -> &EncryptionKey {
        &self.key
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I> Stage for EncryptionStage<I>
where
    I: Stage,
    I::Payload: Obfuscate,
{
    type Payload = I::Payload;

    fn write(&self, payload: Self::Payload) -> Result<()> {
        tracing::debug!(key = %self.key.fingerprint(), "obfuscating payload");
        self.inner.write(payload.obfuscate(&self.key))
    }

    fn read(&self) -> Result<Option<Self::Payload>> {
        self.inner
            .read()?
            .map(|masked| masked.reveal(&self.key))
            .transpose()
    }

    fn describe(&self) -> Vec<&'static str> {
        let mut layers = vec!["encryption"];
        layers.extend(self.inner.describe());
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageError;
    use crate::stage::{Slot, StageExt};
    use kvstage_core::{TextEncoding, Value};
    use kvstage_store::{KeyValueStore, MemoryStore};

    fn key(secret: &str) -> EncryptionKey {
        EncryptionKey::from_secret(secret).unwrap()
    }

    #[test]
    fn test_bytes_are_xored_in_place() {
        let store = MemoryStore::new();
        let chain = EncryptionStage::new(Slot::<_, Bytes>::new(&store, "k").unwrap(), key("secret"));

        chain.write(Bytes::from_static(b"hola")).unwrap();

        assert_eq!(
            store.read("k").unwrap(),
            Some(Value::from(vec![0x1bu8, 0x0a, 0x0f, 0x13]))
        );
        assert_eq!(chain.read().unwrap(), Some(Bytes::from_static(b"hola")));
    }

    #[test]
    fn test_text_is_carried_as_hex() {
        let store = MemoryStore::new();
        let chain = Slot::<_, String>::new(&store, "k")
            .unwrap()
            .encrypted(key("secret"));

        chain.write("hola".to_string()).unwrap();

        assert_eq!(store.read("k").unwrap(), Some(Value::from("1b0a0f13")));
        assert_eq!(chain.read().unwrap(), Some("hola".to_string()));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let store = MemoryStore::new();
        let result = EncryptionStage::with_secret(Slot::<_, Bytes>::new(&store, "k").unwrap(), "");

        assert!(matches!(result, Err(StageError::Configuration(_))));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_empty_payload_round_trips() {
        let store = MemoryStore::new();
        let chain = Slot::<_, Bytes>::new(&store, "k")
            .unwrap()
            .encoded(TextEncoding::Utf8)
            .encrypted(key("secret"));

        chain.write(String::new()).unwrap();
        assert_eq!(chain.read().unwrap(), Some(String::new()));
    }

    #[test]
    fn test_non_hex_text_is_decoding_error() {
        let store = MemoryStore::new();
        store.write("k", Value::from("plain text")).unwrap();

        let chain = Slot::<_, String>::new(&store, "k")
            .unwrap()
            .encrypted(key("secret"));
        assert!(matches!(chain.read(), Err(StageError::Decoding(_))));
    }

    #[test]
    fn test_wrong_key_is_not_an_error() {
        let store = MemoryStore::new();
        Slot::<_, String>::new(&store, "k")
            .unwrap()
            .encrypted(key("secret"))
            .write("hola".to_string())
            .unwrap();

        let revealed = Slot::<_, String>::new(&store, "k")
            .unwrap()
            .encrypted(key("wrong"))
            .read()
            .unwrap();

        assert_ne!(revealed, Some("hola".to_string()));
    }

    #[test]
    fn test_describe_lists_layers() {
        let store = MemoryStore::new();
        let chain = Slot::<_, Bytes>::new(&store, "k")
            .unwrap()
            .encoded(TextEncoding::Utf8)
            .encrypted(key("s"));

        assert_eq!(chain.describe(), vec!["encryption", "encoding", "slot"]);
        assert_eq!(chain.key().len(), 1);
    }
}
