//! Golden test vectors for the repeating-key XOR routine.
//!
//! Each vector fixes the exact bytes a bytes-level encryption stage stores,
//! so a change to the key indexing shows up as a vector mismatch.

use bytes::Bytes;
use kvstage::{EncryptionKey, Slot, Stage, StageExt};
use kvstage_core::Value;
use kvstage_store::{KeyValueStore, MemoryStore};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// XOR secret.
    pub secret: &'static [u8],
    /// Plaintext payload.
    pub plaintext: &'static [u8],
    /// Expected stored bytes (hex).
    pub expected_masked: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "hola under secret",
            secret: b"secret",
            plaintext: b"hola",
            expected_masked: "1b0a0f13",
        },
        GoldenVector {
            name: "empty payload",
            secret: b"secret",
            plaintext: b"",
            expected_masked: "",
        },
        GoldenVector {
            name: "single byte key repeats",
            secret: b"k",
            plaintext: b"first",
            expected_masked: "0d0219181f",
        },
        GoldenVector {
            name: "multibyte utf-8 with key wrap",
            secret: b"key",
            plaintext: "niño".as_bytes(),
            expected_masked: "050cbada0a",
        },
        GoldenVector {
            name: "zero key is identity",
            secret: &[0x00],
            plaintext: b"hello world",
            expected_masked: "68656c6c6f20776f726c64",
        },
        GoldenVector {
            name: "key longer than payload",
            secret: b"abcdef",
            plaintext: b"abc",
            expected_masked: "000000",
        },
    ]
}

/// Write a vector's plaintext through a bytes-level encryption stage and
/// return the hex of what reached the store.
pub fn masked_from_vector(vector: &GoldenVector) -> String {
    let store = MemoryStore::new();
    let key = EncryptionKey::new(vector.secret).expect("golden vector secrets are non-empty");
    let chain = Slot::<_, Bytes>::new(&store, "golden")
        .expect("static key is non-empty")
        .encrypted(key);

    chain
        .write(Bytes::from_static(vector.plaintext))
        .expect("memory store does not fail");

    match store.read("golden").expect("memory store does not fail") {
        Some(Value::Bytes(bytes)) => hex::encode(bytes),
        other => panic!("vector '{}' stored {:?}", vector.name, other),
    }
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, actual_hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let actual = masked_from_vector(v);
            (v.name.to_string(), actual == v.expected_masked, actual)
        })
        .collect()
}
