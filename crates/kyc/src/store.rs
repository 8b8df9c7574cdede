//! Record store contract.

use std::sync::Arc;

use thiserror::Error;

use veriflow_core::{DomainError, ExpectedVersion, UserId};
use veriflow_provider::{Provider, ProviderReference};

use crate::record::VerificationRecord;

/// Record store operation error.
///
/// These are infrastructure errors; the engine maps them onto the domain
/// taxonomy (`Concurrency`/`ReferenceTaken` surface as conflicts, the rest
/// as internal failures).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("provider reference already bound: {0}")]
    ReferenceTaken(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Concurrency(msg) => DomainError::conflict(msg),
            StoreError::ReferenceTaken(msg) => DomainError::conflict(msg),
            StoreError::InvalidRecord(msg) => DomainError::internal(msg),
            StoreError::Storage(msg) => DomainError::internal(msg),
        }
    }
}

/// Persistence for one verification record per user.
///
/// Implementations must:
/// - enforce the per-record optimistic concurrency check on `upsert`
///   (per-record serializability: a callback and a concurrent admin sync
///   must not both commit from the same prior state)
/// - enforce `(provider, reference)` uniqueness across records
/// - validate record invariants before writing
/// - never hard-delete (records are the compliance audit trail)
pub trait RecordStore: Send + Sync {
    /// The record owned by a user, if any.
    fn get_by_user(&self, user_id: UserId) -> Result<Option<VerificationRecord>, StoreError>;

    /// Resolve a record by its reconciliation key.
    fn get_by_reference(
        &self,
        provider: Provider,
        reference: &ProviderReference,
    ) -> Result<Option<VerificationRecord>, StoreError>;

    /// Create or replace a record, guarded by the expected version.
    ///
    /// Returns the stored record with its newly assigned version.
    fn upsert(
        &self,
        record: VerificationRecord,
        expected: ExpectedVersion,
    ) -> Result<VerificationRecord, StoreError>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn get_by_user(&self, user_id: UserId) -> Result<Option<VerificationRecord>, StoreError> {
        (**self).get_by_user(user_id)
    }

    fn get_by_reference(
        &self,
        provider: Provider,
        reference: &ProviderReference,
    ) -> Result<Option<VerificationRecord>, StoreError> {
        (**self).get_by_reference(provider, reference)
    }

    fn upsert(
        &self,
        record: VerificationRecord,
        expected: ExpectedVersion,
    ) -> Result<VerificationRecord, StoreError> {
        (**self).upsert(record, expected)
    }
}
