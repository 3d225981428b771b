//! Common error types for VeilNote.

use thiserror::Error;

/// Top-level error type for VeilNote operations.
///
/// Every failure is raised at the point of detection and propagated to the
/// caller unmodified; none of these conditions is transient, so no retry
/// logic exists anywhere in the workspace.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed key-array or document data (wrong lengths or types).
    #[error("Structural error: {0}")]
    Structural(String),

    /// Password failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Key material for the current cipher generation must not be empty.
    #[error("Key material must not be empty")]
    EmptyKeyMaterial,

    /// MAC mismatch on an authenticated payload. No plaintext is ever
    /// returned alongside this error, not even a truncated prefix.
    #[error("Encrypted payload authentication failed")]
    AuthenticationFailure,

    /// Document carries a version tag outside the supported set.
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(u64),

    /// Pattern index outside the registered range.
    #[error("Unknown pattern index: {0}")]
    UnknownPattern(u8),

    /// Key-array layer index out of range.
    #[error("Layer index {index} out of range (layer count {count})")]
    LayerIndex { index: usize, count: usize },

    /// A cryptographic primitive failed internally.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
