//! Error types for pipeline stages.

use kvstage_core::CoreError;
use kvstage_store::StoreError;
use thiserror::Error;

/// Errors that can occur while building or driving a stage chain.
///
/// Stages never recover from an inner stage's error; it reaches the caller
/// unchanged.
#[derive(Debug, Error)]
pub enum StageError {
    /// Invalid construction, e.g. an empty encryption key.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The payload cannot be represented in the declared text encoding.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Stored data is inconsistent with what the stage expects.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<CoreError> for StageError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Configuration(msg) => StageError::Configuration(msg),
            CoreError::Encoding(msg) => StageError::Encoding(msg),
            CoreError::Decoding(msg) => StageError::Decoding(msg),
        }
    }
}

/// Result type for stage operations.
pub type Result<T> = std::result::Result<T, StageError>;
