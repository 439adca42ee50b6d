//! Error types for `notekv-core`.
//!
//! Errors never carry secret material: credential failures describe the
//! encoding problem, not the value.

use notekv_storage::StorageError;

/// Errors from note and password-record operations.
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    /// The underlying storage backend returned an error.
    #[error("note storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored value is not valid UTF-8.
    #[error("stored value for '{key}' is not valid UTF-8")]
    Corrupt { key: String },
}

/// Errors from decoding a credential carried in the `q` query parameter.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The parameter is not valid base64 once re-padded.
    #[error("invalid credential encoding: {reason}")]
    Base64 { reason: String },

    /// The decoded bytes are not valid UTF-8.
    #[error("credential is not valid UTF-8")]
    NotUtf8,
}

/// Errors from turning a URL path into a note name.
#[derive(Debug, thiserror::Error)]
pub enum NameError {
    /// The name exceeds the maximum length.
    #[error("note name is {len} bytes, maximum is {max}")]
    TooLong { len: usize, max: usize },

    /// The name collides with the password-record key space.
    #[error("note name '{name}' ends with the reserved suffix '{suffix}'")]
    ReservedSuffix { name: String, suffix: &'static str },

    /// The name contains a control character.
    #[error("note name contains control characters")]
    ControlCharacter,
}
