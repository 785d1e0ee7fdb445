//! The payload model shared by stores and stages.
//!
//! Stores are untyped: they accept and return a [`Value`]. Stages are typed:
//! each one declares the concrete representation it handles, and the base
//! slot converts through [`StoredValue`] at the store boundary.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A value as held by a key/value store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Structured text.
    Text(String),
    /// An opaque byte sequence.
    Bytes(Bytes),
}

/// Discriminant of a [`Value`], used in error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Bytes,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => f.write_str("text"),
            ValueKind::Bytes => f.write_str("bytes"),
        }
    }
}

impl Value {
    /// Which variant this value is.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }

    /// Length of the payload in bytes.
    pub fn len(&self) -> usize {
        match self {
            Value::Text(s) => s.len(),
            Value::Bytes(b) => b.len(),
        }
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Bytes(_) => None,
        }
    }

    /// Borrow the bytes, if this is a bytes value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Text(_) => None,
            Value::Bytes(b) => Some(b),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(b))
    }
}

/// A concrete representation that can be stored as a [`Value`].
///
/// `from_value` fails with [`CoreError::Decoding`] when the stored variant
/// does not match the requested representation.
pub trait StoredValue: Sized {
    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

impl StoredValue for Value {
    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl StoredValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(ValueKind::Text, other.kind())),
        }
    }
}

impl StoredValue for Bytes {
    fn into_value(self) -> Value {
        Value::Bytes(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(mismatch(ValueKind::Bytes, other.kind())),
        }
    }
}

fn mismatch(expected: ValueKind, found: ValueKind) -> CoreError {
    CoreError::Decoding(format!("expected stored {expected}, found {found}"))
}
