use std::sync::RwLock;

use veriflow_core::RecordId;

use crate::event::AuditEvent;
use crate::r#trait::{AuditError, AuditTrail};

/// In-memory append-only audit trail.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryAuditTrail {
    entries: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all records.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditTrail for InMemoryAuditTrail {
    fn append(&self, event: AuditEvent) -> Result<(), AuditError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuditError::Append("lock poisoned".to_string()))?;
        entries.push(event);
        Ok(())
    }

    fn for_record(&self, record_id: RecordId) -> Result<Vec<AuditEvent>, AuditError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AuditError::Read("lock poisoned".to_string()))?;

        Ok(entries
            .iter()
            .filter(|e| e.record_id == record_id)
            .cloned()
            .collect())
    }
}
