//! Repeating XOR keys.
//!
//! XOR with a repeating key is reversible obfuscation only. It carries no
//! integrity check: decrypting with the wrong key yields different bytes, not
//! an error.

use std::fmt;

use rand::RngCore;

use crate::error::{CoreError, Result};

/// Domain separator for key fingerprints.
const FINGERPRINT_CONTEXT: &str = "kvstage-v0-key-fingerprint";

/// A non-empty secret used as a repeating XOR mask.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey(Vec<u8>);

impl EncryptionKey {
    /// Create a key from raw bytes.
    ///
    /// Fails with [`CoreError::Configuration`] if `bytes` is empty.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CoreError::Configuration(
                "encryption key must not be empty".into(),
            ));
        }
        Ok(Self(bytes))
    }

    /// Create a key from a text secret (its UTF-8 bytes).
    pub fn from_secret(secret: &str) -> Result<Self> {
        Self::new(secret.as_bytes())
    }

    /// Generate a random key of `len` bytes.
    pub fn generate(len: usize) -> Result<Self> {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes. Never zero.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Short, non-reversible identifier safe to log.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new_derive_key(FINGERPRINT_CONTEXT);
        hasher.update(&self.0);
        hex::encode(&hasher.finalize().as_bytes()[..4])
    }

    /// XOR `data` with this key, repeated cyclically.
    pub fn apply(&self, data: &[u8]) -> Vec<u8> {
        xor_cycle(data, &self.0)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("len", &self.0.len())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// XOR every byte of `data` with `key[i % key.len()]`, `i` being the byte's
/// position in `data`.
///
/// Returns `data` unchanged when `key` is empty.
pub fn xor_cycle(data: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return data.to_vec();
    }
    data.iter()
        .enumerate()
        .map(|(i, b)| b ^ key[i % key.len()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            EncryptionKey::new(Vec::new()),
            Err(CoreError::Configuration(_))
        ));
        assert!(matches!(
            EncryptionKey::from_secret(""),
            Err(CoreError::Configuration(_))
        ));
        assert!(EncryptionKey::generate(0).is_err());
    }

    #[test]
    fn test_key_repeats_by_position() {
        let key = EncryptionKey::new(vec![0x01, 0x02]).unwrap();
        assert_eq!(key.apply(&[0, 0, 0, 0, 0]), vec![1, 2, 1, 2, 1]);
    }

    #[test]
    fn test_hola_secret() {
        let key = EncryptionKey::from_secret("secret").unwrap();
        assert_eq!(key.apply(b"hola"), vec![0x1b, 0x0a, 0x0f, 0x13]);
    }

    #[test]
    fn test_empty_payload() {
        let key = EncryptionKey::from_secret("k").unwrap();
        assert!(key.apply(&[]).is_empty());
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = EncryptionKey::from_secret("hunter2").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains(&key.fingerprint()));
        assert_eq!(key.fingerprint().len(), 8);
    }

    #[test]
    fn test_generate_length() {
        let key = EncryptionKey::generate(32).unwrap();
        assert_eq!(key.len(), 32);
    }

    proptest! {
        #[test]
        fn test_xor_is_involution(
            data in prop::collection::vec(any::<u8>(), 0..256),
            key in prop::collection::vec(any::<u8>(), 1..32),
        ) {
            let key = EncryptionKey::new(key).unwrap();
            prop_assert_eq!(key.apply(&key.apply(&data)), data);
        }
    }
}
