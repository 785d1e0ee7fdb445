//! # kvstage Core
//!
//! Core primitives for kvstage pipelines: the payload model shared by every
//! stage, the text encodings used by the encoding stage, and the repeating
//! XOR key used by the encryption stage.
//!
//! ## Key Types
//!
//! - [`Value`] - Tagged payload accepted by every key/value store
//! - [`StoredValue`] - Conversion between [`Value`] and a concrete representation
//! - [`TextEncoding`] - Text ⇄ bytes conversion with strict decoding
//! - [`EncryptionKey`] - Non-empty repeating XOR mask
//!
//! ## Design Principles
//!
//! - **Typed boundaries**: stores see [`Value`], stages see `String` or `Bytes`
//! - **Strict decoding**: invalid bytes are an error, never replacement text
//! - **No integrity**: XOR obfuscation round-trips but detects nothing

pub mod encoding;
pub mod error;
pub mod key;
pub mod value;

pub use encoding::TextEncoding;
pub use error::{CoreError, Result};
pub use key::{xor_cycle, EncryptionKey};
pub use value::{StoredValue, Value, ValueKind};
