use std::sync::Arc;

use thiserror::Error;

use veriflow_core::RecordId;

use crate::event::AuditEvent;

/// Audit trail operation error.
///
/// These are infrastructure errors (storage, lock poisoning), not domain
/// errors: a failed append must surface loudly, never drop the entry.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit append failed: {0}")]
    Append(String),

    #[error("audit read failed: {0}")]
    Read(String),
}

/// Append-only audit trail.
///
/// Implementations must:
/// - be append-only (no update or delete surface at all)
/// - preserve insertion order per record
/// - be safe to call from concurrent request handlers
pub trait AuditTrail: Send + Sync {
    /// Append one transition entry.
    fn append(&self, event: AuditEvent) -> Result<(), AuditError>;

    /// All entries for a record, oldest first.
    fn for_record(&self, record_id: RecordId) -> Result<Vec<AuditEvent>, AuditError>;
}

impl<T> AuditTrail for Arc<T>
where
    T: AuditTrail + ?Sized,
{
    fn append(&self, event: AuditEvent) -> Result<(), AuditError> {
        (**self).append(event)
    }

    fn for_record(&self, record_id: RecordId) -> Result<Vec<AuditEvent>, AuditError> {
        (**self).for_record(record_id)
    }
}
