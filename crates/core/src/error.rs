//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. The store
/// convenience APIs swallow `NotFound` and `InvalidQuantity`; the command-side
/// `handle` surfaces them for callers that want to know.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The mutation target does not exist.
    #[error("not found")]
    NotFound,

    /// A quantity adjustment would leave a cart line at zero or below.
    #[error("invalid quantity: {current} {delta:+} would be {result}")]
    InvalidQuantity { current: u32, delta: i64, result: i64 },

    /// A conflict occurred (e.g. an id is already taken).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Errors the kiosk policy treats as silent no-ops.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::NotFound | Self::InvalidQuantity { .. })
    }
}
