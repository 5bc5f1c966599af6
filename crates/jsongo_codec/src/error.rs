//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input is not well-formed JSON.
    #[error("malformed JSON: {message}")]
    Json {
        /// Parser diagnostic, including line and column.
        message: String,
    },

    /// The top-level value is not an array.
    #[error("expected a JSON array of documents, found {found}")]
    NotAnArray {
        /// Kind of the value that was found.
        found: &'static str,
    },

    /// An element of the top-level array is not an object.
    #[error("element {index} is not a document: expected an object, found {found}")]
    NotAnObject {
        /// Position of the offending element.
        index: usize,
        /// Kind of the value that was found.
        found: &'static str,
    },

    /// Failed to encode a value to JSON.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },
}

impl CodecError {
    /// Create a malformed JSON error.
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::encoding_failed(err.to_string())
        } else {
            Self::json(err.to_string())
        }
    }
}
