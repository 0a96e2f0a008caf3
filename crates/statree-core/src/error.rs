//! Shared error type across statree crates.

use thiserror::Error;

/// Adapter-facing error kinds (stable API).
///
/// Filesystem/HTTP adapters are expected to map each kind to the nearest
/// equivalent of their own error vocabulary (e.g. POSIX errno) and carry on;
/// one failed request must not corrupt tree state or block other requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Node name is empty or contains a prohibited character.
    InvalidName,
    /// Non-root node constructed without a parent.
    MissingParent,
    /// Directory entry name already occupied by a live entry.
    NameConflict,
    /// Operation not implemented by this file.
    Unsupported,
    /// Aggregation source lacks the configured dictionary field.
    MissingField,
    /// Aggregation matched a file without a read operation.
    MissingRead,
    /// Heterogeneous scalar alternatives or units across an aggregation input set.
    TypeMismatch,
    /// Malformed aggregation operation set or pattern.
    InvalidConfiguration,
    /// Unknown aggregation method tag.
    InvalidMethod,
    /// Weakly-held pattern root no longer exists.
    StaleReference,
    /// Internal invariant breach.
    Internal,
}

impl ErrorKind {
    /// String representation used by adapters and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidName => "INVALID_NAME",
            ErrorKind::MissingParent => "MISSING_PARENT",
            ErrorKind::NameConflict => "NAME_CONFLICT",
            ErrorKind::Unsupported => "UNSUPPORTED",
            ErrorKind::MissingField => "MISSING_FIELD",
            ErrorKind::MissingRead => "MISSING_READ",
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ErrorKind::InvalidConfiguration => "INVALID_CONFIGURATION",
            ErrorKind::InvalidMethod => "INVALID_METHOD",
            ErrorKind::StaleReference => "STALE_REFERENCE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StatreeError>;

/// Unified error type used across the telemetry tree.
#[derive(Debug, Error)]
pub enum StatreeError {
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("missing parent: {0}")]
    MissingParent(String),
    #[error("name conflict: {0}")]
    NameConflict(String),
    #[error("operation not supported: {0}")]
    Unsupported(String),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("missing read operation: {0}")]
    MissingRead(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid aggregation method: {0}")]
    InvalidMethod(String),
    #[error("stale reference: {0}")]
    StaleReference(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl StatreeError {
    /// Map internal error to a stable adapter-facing kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatreeError::InvalidName(_) => ErrorKind::InvalidName,
            StatreeError::MissingParent(_) => ErrorKind::MissingParent,
            StatreeError::NameConflict(_) => ErrorKind::NameConflict,
            StatreeError::Unsupported(_) => ErrorKind::Unsupported,
            StatreeError::MissingField(_) => ErrorKind::MissingField,
            StatreeError::MissingRead(_) => ErrorKind::MissingRead,
            StatreeError::TypeMismatch(_) => ErrorKind::TypeMismatch,
            StatreeError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            StatreeError::InvalidMethod(_) => ErrorKind::InvalidMethod,
            StatreeError::StaleReference(_) => ErrorKind::StaleReference,
            StatreeError::Internal(_) => ErrorKind::Internal,
        }
    }
}
