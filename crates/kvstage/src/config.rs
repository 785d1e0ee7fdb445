//! Declarative pipeline configuration.
//!
//! A [`PipelineConfig`] describes a text pipeline: which key to address, how
//! to encode text, and whether (and where) to apply XOR obfuscation. It can be
//! loaded from JSON and turned into a boxed stage chain over any store.

use bytes::Bytes;
use kvstage_core::{EncryptionKey, TextEncoding};
use kvstage_store::KeyValueStore;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StageError};
use crate::stage::{BoxedStage, Slot, Stage, StageExt};

/// Where the encryption stage sits relative to the encoding stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layering {
    /// Encryption outermost: text is obfuscated, then encoded.
    #[default]
    EncryptThenEncode,
    /// Encoding outermost: text is encoded, then the bytes are obfuscated.
    ///
    /// Reading with the wrong key hands the encoding stage bytes that are
    /// usually not valid in the declared encoding, so the read fails with
    /// [`StageError::Decoding`] rather than returning garbage text.
    EncodeThenEncrypt,
}

/// Configuration for a text pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Key of the slot the pipeline reads and writes.
    pub key: String,
    /// Text encoding applied before storage.
    pub encoding: TextEncoding,
    /// XOR secret. `None` disables the encryption stage.
    pub encryption_key: Option<String>,
    /// Stage order when encryption is enabled.
    pub layering: Layering,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            key: "payload".to_string(),
            encoding: TextEncoding::Utf8,
            encryption_key: None,
            layering: Layering::default(),
        }
    }
}

impl PipelineConfig {
    /// Config for `key` with default encoding and no encryption.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn encryption_key(mut self, secret: impl Into<String>) -> Self {
        self.encryption_key = Some(secret.into());
        self
    }

    pub fn layering(mut self, layering: Layering) -> Self {
        self.layering = layering;
        self
    }

    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| StageError::Configuration(format!("invalid pipeline config: {e}")))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StageError::Configuration(format!("cannot serialize config: {e}")))
    }

    /// Check the config without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(StageError::Configuration("slot key must not be empty".into()));
        }
        if let Some(secret) = &self.encryption_key {
            EncryptionKey::from_secret(secret)?;
        }
        Ok(())
    }

    /// Build the text pipeline over `store`.
    ///
    /// All validation happens here, before any read or write.
    pub fn build<S>(&self, store: S) -> Result<BoxedStage<String>>
    where
        S: KeyValueStore + 'static,
    {
        self.validate()?;
        let slot = Slot::<S, Bytes>::new(store, self.key.clone())?;

        let chain = match &self.encryption_key {
            None => slot.encoded(self.encoding).boxed(),
            Some(secret) => {
                let key = EncryptionKey::from_secret(secret)?;
                match self.layering {
                    Layering::EncryptThenEncode => {
                        slot.encoded(self.encoding).encrypted(key).boxed()
                    }
                    Layering::EncodeThenEncrypt => {
                        slot.encrypted(key).encoded(self.encoding).boxed()
                    }
                }
            }
        };

        tracing::debug!(
            key = %self.key,
            encoding = %self.encoding,
            layers = ?chain.describe(),
            "built pipeline"
        );
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvstage_store::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.key, "payload");
        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert!(config.encryption_key.is_none());
        assert_eq!(config.layering, Layering::EncryptThenEncode);
    }

    #[test]
    fn test_from_json() {
        let config = PipelineConfig::from_json(
            r#"{
                "key": "k",
                "encoding": "utf-16le",
                "encryption_key": "secret",
                "layering": "encode-then-encrypt"
            }"#,
        )
        .unwrap();

        assert_eq!(
            config,
            PipelineConfig::new("k")
                .encoding(TextEncoding::Utf16Le)
                .encryption_key("secret")
                .layering(Layering::EncodeThenEncrypt)
        );
    }

    #[test]
    fn test_json_round_trip_and_partial_documents() {
        let config = PipelineConfig::new("k").encryption_key("s");
        let parsed = PipelineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);

        let partial = PipelineConfig::from_json(r#"{"key": "only"}"#).unwrap();
        assert_eq!(partial, PipelineConfig::new("only"));
    }

    #[test]
    fn test_bad_json_is_configuration_error() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{"encoding": "klingon"}"#),
            Err(StageError::Configuration(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json(r#"{"unexpected": 1}"#),
            Err(StageError::Configuration(_))
        ));
    }

    #[test]
    fn test_build_rejects_empty_secret_before_io() {
        let store = Arc::new(MemoryStore::new());
        let result = PipelineConfig::new("k").encryption_key("").build(store.clone());

        assert!(matches!(result, Err(StageError::Configuration(_))));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_build_layer_order() {
        let store = Arc::new(MemoryStore::new());

        let plain = PipelineConfig::new("k").build(store.clone()).unwrap();
        assert_eq!(plain.describe(), vec!["encoding", "slot"]);

        let outer = PipelineConfig::new("k")
            .encryption_key("s")
            .build(store.clone())
            .unwrap();
        assert_eq!(outer.describe(), vec!["encryption", "encoding", "slot"]);

        let inner = PipelineConfig::new("k")
            .encryption_key("s")
            .layering(Layering::EncodeThenEncrypt)
            .build(store)
            .unwrap();
        assert_eq!(inner.describe(), vec!["encoding", "encryption", "slot"]);
    }
}
