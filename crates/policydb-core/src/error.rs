//! Shared error type across policydb crates.

use thiserror::Error;

/// Stable error codes surfaced to callers and over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Key absent from the store.
    NotFound,
    /// Decoded value is not the entity kind expected for its namespace.
    TypeMismatch,
    /// Codec could not parse the stored bytes.
    DecodeFailure,
    /// Store or feed unreachable.
    BackendUnavailable,
    /// Invalid configuration.
    BadConfig,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ErrorKind::DecodeFailure => "DECODE_FAILURE",
            ErrorKind::BackendUnavailable => "BACKEND_UNAVAILABLE",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PolicyDbError>;

/// Unified error type used by core and client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyDbError {
    #[error("not found: {namespace}/{key}")]
    NotFound { namespace: String, key: String },
    #[error("type mismatch at {namespace}/{key}: expected {expected}, found {found}")]
    TypeMismatch {
        namespace: String,
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("decode failure: {0}")]
    DecodeFailure(String),
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PolicyDbError {
    /// Map the error to its stable code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PolicyDbError::NotFound { .. } => ErrorKind::NotFound,
            PolicyDbError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            PolicyDbError::DecodeFailure(_) => ErrorKind::DecodeFailure,
            PolicyDbError::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            PolicyDbError::BadConfig(_) => ErrorKind::BadConfig,
            PolicyDbError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn not_found(namespace: &str, key: &str) -> Self {
        PolicyDbError::NotFound {
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    }
}
