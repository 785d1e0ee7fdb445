//! Proptest generators for property-based testing.

use proptest::prelude::*;

use kvstage::{Layering, PipelineConfig};
use kvstage_core::TextEncoding;

/// Arbitrary text payloads, including the empty string and non-ASCII.
pub fn text_payload() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z ]{1,32}",
        any::<String>(),
    ]
}

/// A non-empty text secret.
pub fn secret() -> impl Strategy<Value = String> {
    prop_oneof!["[a-zA-Z0-9]{1,16}", "\\PC{1,8}"]
}

/// A raw byte payload up to `max_len` bytes.
pub fn byte_payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// A slot key.
pub fn slot_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9._-]{0,15}".prop_map(String::from)
}

/// An encoding that can represent every string.
pub fn unicode_encoding() -> impl Strategy<Value = TextEncoding> {
    prop_oneof![
        Just(TextEncoding::Utf8),
        Just(TextEncoding::Utf16Le),
        Just(TextEncoding::Utf16Be),
    ]
}

pub fn layering() -> impl Strategy<Value = Layering> {
    prop_oneof![
        Just(Layering::EncryptThenEncode),
        Just(Layering::EncodeThenEncrypt),
    ]
}

/// A valid pipeline config, with or without encryption.
pub fn pipeline_config() -> impl Strategy<Value = PipelineConfig> {
    (
        slot_key(),
        unicode_encoding(),
        prop::option::of(secret()),
        layering(),
    )
        .prop_map(|(key, encoding, secret, layering)| PipelineConfig {
            key,
            encoding,
            encryption_key: secret,
            layering,
        })
}
