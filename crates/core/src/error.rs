//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error taxonomy.
///
/// Keep this focused on deterministic, business/domain failures. Callers map
/// these onto their transport of choice; nothing here assumes HTTP.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed schema/field-level validation. User-correctable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Authorization failure: bad signature or insufficient role.
    ///
    /// Deliberately carries no detail. Signature failures especially must not
    /// reveal which check failed; full context goes to the server-side log.
    #[error("forbidden")]
    Forbidden,

    /// No record exists, or a provider reference did not resolve.
    #[error("not found")]
    NotFound,

    /// An illegal state transition or a stale concurrent write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The provider gateway failed. Retryable; local state was not mutated.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Persistence failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Whether the caller may retry the operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }
}
