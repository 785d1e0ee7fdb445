//! Encoding stage: structured text outside, encoded bytes inside.

use bytes::Bytes;
use kvstage_core::TextEncoding;

use crate::error::Result;
use crate::stage::Stage;

/// Converts text to bytes on write and bytes to text on read.
///
/// Stored bytes that are invalid under the declared encoding are reported as
/// [`StageError::Decoding`](crate::StageError::Decoding).
pub struct EncodingStage<I> {
    inner: I,
    encoding: TextEncoding,
}

impl<I: Stage<Payload = Bytes>> EncodingStage<I> {
    pub fn new(inner: I, encoding: TextEncoding) -> Self {
        Self { inner, encoding }
    }

    /// Build from an encoding label such as `"utf-8"`.
    pub fn with_label(inner: I, label: &str) -> Result<Self> {
        Ok(Self::new(inner, label.parse::<TextEncoding>()?))
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: Stage<Payload = Bytes>> Stage for EncodingStage<I> {
    type Payload = String;

    fn write(&self, payload: String) -> Result<()> {
        let bytes = self.encoding.encode(&payload)?;
        self.inner.write(Bytes::from(bytes))
    }

    fn read(&self) -> Result<Option<String>> {
        match self.inner.read()? {
            Some(bytes) => Ok(Some(self.encoding.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn describe(&self) -> Vec<&'static str> {
        let mut layers = vec!["encoding"];
        layers.extend(self.inner.describe());
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageError;
    use crate::stage::Slot;
    use kvstage_core::Value;
    use kvstage_store::{KeyValueStore, MemoryStore};

    #[test]
    fn test_stores_encoded_bytes() {
        let store = MemoryStore::new();
        let chain = EncodingStage::new(
            Slot::<_, Bytes>::new(&store, "k").unwrap(),
            TextEncoding::Utf16Le,
        );

        chain.write("hi".to_string()).unwrap();

        assert_eq!(
            store.read("k").unwrap(),
            Some(Value::from(vec![b'h', 0, b'i', 0]))
        );
        assert_eq!(chain.read().unwrap(), Some("hi".to_string()));
    }

    #[test]
    fn test_invalid_stored_bytes_is_decoding_error() {
        let store = MemoryStore::new();
        store.write("k", Value::from(vec![0xc3u8, 0x28])).unwrap();

        let chain = EncodingStage::new(
            Slot::<_, Bytes>::new(&store, "k").unwrap(),
            TextEncoding::Utf8,
        );
        assert!(matches!(chain.read(), Err(StageError::Decoding(_))));
    }

    #[test]
    fn test_unrepresentable_text_is_encoding_error() {
        let store = MemoryStore::new();
        let chain = EncodingStage::new(
            Slot::<_, Bytes>::new(&store, "k").unwrap(),
            TextEncoding::Ascii,
        );

        assert!(matches!(
            chain.write("niño".to_string()),
            Err(StageError::Encoding(_))
        ));
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn test_absent_slot_reads_none() {
        let store = MemoryStore::new();
        let chain =
            EncodingStage::with_label(Slot::<_, Bytes>::new(&store, "k").unwrap(), "UTF-8")
                .unwrap();

        assert_eq!(chain.encoding(), TextEncoding::Utf8);
        assert_eq!(chain.read().unwrap(), None);
        assert_eq!(chain.describe(), vec!["encoding", "slot"]);
    }

    #[test]
    fn test_unknown_label_is_configuration_error() {
        let store = MemoryStore::new();
        let result = EncodingStage::with_label(Slot::<_, Bytes>::new(&store, "k").unwrap(), "koi8");
        assert!(matches!(result, Err(StageError::Configuration(_))));
    }
}
