//! Text encodings for converting structured text to bytes and back.
//!
//! Decoding is strict: bytes that are not valid under the declared encoding
//! produce [`CoreError::Decoding`] instead of replacement characters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A text encoding supported by the encoding stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    /// 7-bit US-ASCII.
    Ascii,
}

impl TextEncoding {
    /// Canonical label, e.g. `"utf-8"`.
    pub const fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
            TextEncoding::Ascii => "ascii",
        }
    }

    /// Encode text into bytes.
    ///
    /// Only [`TextEncoding::Ascii`] can fail, on any non-ASCII character.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            TextEncoding::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            TextEncoding::Ascii => match text.char_indices().find(|(_, c)| !c.is_ascii()) {
                Some((pos, c)) => Err(CoreError::Encoding(format!(
                    "character {c:?} at byte {pos} is not representable in ascii"
                ))),
                None => Ok(text.as_bytes().to_vec()),
            },
        }
    }

    /// Decode bytes back into text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| CoreError::Decoding(format!("invalid utf-8: {e}"))),
            TextEncoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            TextEncoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            TextEncoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(pos) => Err(CoreError::Decoding(format!(
                    "byte 0x{:02x} at offset {pos} is not ascii",
                    bytes[pos]
                ))),
                // All bytes are ASCII, so this is valid UTF-8.
                None => Ok(bytes.iter().map(|&b| b as char).collect()),
            },
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(CoreError::Decoding(format!(
            "utf-16 input has odd length {}",
            bytes.len()
        )));
    }

    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| CoreError::Decoding(format!("invalid utf-16: {e}")))
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-16le" | "utf16le" | "utf-16-le" => Ok(TextEncoding::Utf16Le),
            "utf-16be" | "utf16be" | "utf-16-be" => Ok(TextEncoding::Utf16Be),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            other => Err(CoreError::Configuration(format!(
                "unsupported text encoding: {other:?}"
            ))),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(e: TextEncoding) -> Self {
        e.label().to_owned()
    }
}
