use std::collections::HashMap;
use std::sync::RwLock;

use veriflow_core::{ExpectedVersion, UserId};
use veriflow_provider::{Provider, ProviderReference};

use crate::record::VerificationRecord;
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    by_user: HashMap<UserId, VerificationRecord>,
    /// Reconciliation index: `(provider, reference)` → owning user.
    by_reference: HashMap<(Provider, String), UserId>,
}

/// In-memory record store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<Inner>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get_by_user(&self, user_id: UserId) -> Result<Option<VerificationRecord>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(inner.by_user.get(&user_id).cloned())
    }

    fn get_by_reference(
        &self,
        provider: Provider,
        reference: &ProviderReference,
    ) -> Result<Option<VerificationRecord>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let key = (provider, reference.as_str().to_string());
        Ok(inner
            .by_reference
            .get(&key)
            .and_then(|user_id| inner.by_user.get(user_id))
            .cloned())
    }

    fn upsert(
        &self,
        mut record: VerificationRecord,
        expected: ExpectedVersion,
    ) -> Result<VerificationRecord, StoreError> {
        record
            .validate()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let user_id = record.user_id();
        let current = inner
            .by_user
            .get(&user_id)
            .map(|existing| existing.version())
            .unwrap_or(0);

        if !expected.matches(current) {
            return Err(StoreError::Concurrency(format!(
                "expected {expected:?}, found {current}"
            )));
        }

        // Reference uniqueness: a vendor reference resolves to at most one
        // record, across all users.
        let new_key = record.provider().zip(record.provider_reference()).map(
            |(provider, reference)| (provider, reference.as_str().to_string()),
        );
        if let Some(key) = &new_key {
            if let Some(owner) = inner.by_reference.get(key) {
                if *owner != user_id {
                    return Err(StoreError::ReferenceTaken(format!(
                        "{}/{}",
                        key.0, key.1
                    )));
                }
            }
        }

        // Drop the old index entry when a re-initiation replaced the
        // reference. Old references are never trusted again.
        let old_key = inner.by_user.get(&user_id).and_then(|existing| {
            existing
                .provider()
                .zip(existing.provider_reference())
                .map(|(provider, reference)| (provider, reference.as_str().to_string()))
        });
        if let Some(old) = old_key {
            if new_key.as_ref() != Some(&old) {
                inner.by_reference.remove(&old);
            }
        }
        if let Some(key) = new_key {
            inner.by_reference.insert(key, user_id);
        }

        record.set_version(current + 1);
        inner.by_user.insert(user_id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use veriflow_core::DomainError;

    use super::*;
    use crate::submission::SubmissionRequest;

    fn new_record(user_id: UserId) -> VerificationRecord {
        let data = SubmissionRequest {
            document_type: "passport".to_string(),
            country: "US".to_string(),
        }
        .validate()
        .unwrap();
        VerificationRecord::new_submission(user_id, data, Utc::now())
    }

    fn bound_record(user_id: UserId, reference: &str) -> VerificationRecord {
        let mut record = new_record(user_id);
        record
            .bind_session(
                Provider::Veriff,
                ProviderReference::new(reference).unwrap(),
                Utc::now(),
            )
            .unwrap();
        record
    }

    #[test]
    fn upsert_assigns_versions_and_lookup_by_user_works() {
        let store = InMemoryRecordStore::new();
        let user_id = UserId::new();

        let stored = store
            .upsert(new_record(user_id), ExpectedVersion::Exact(0))
            .unwrap();
        assert_eq!(stored.version(), 1);

        let loaded = store.get_by_user(user_id).unwrap().unwrap();
        assert_eq!(loaded, stored);

        let stored = store
            .upsert(loaded, ExpectedVersion::Exact(1))
            .unwrap();
        assert_eq!(stored.version(), 2);
    }

    #[test]
    fn stale_writer_is_rejected() {
        let store = InMemoryRecordStore::new();
        let user_id = UserId::new();

        let stored = store
            .upsert(new_record(user_id), ExpectedVersion::Exact(0))
            .unwrap();

        // Two readers load version 1; only the first commit wins.
        store
            .upsert(stored.clone(), ExpectedVersion::Exact(stored.version()))
            .unwrap();
        let err = store
            .upsert(stored.clone(), ExpectedVersion::Exact(stored.version()))
            .unwrap_err();
        assert!(matches!(&err, StoreError::Concurrency(_)));
        assert!(matches!(DomainError::from(err), DomainError::Conflict(_)));
    }

    #[test]
    fn reference_resolves_to_the_bound_record() {
        let store = InMemoryRecordStore::new();
        let user_id = UserId::new();

        store
            .upsert(bound_record(user_id, "ref-1"), ExpectedVersion::Exact(0))
            .unwrap();

        let reference = ProviderReference::new("ref-1").unwrap();
        let found = store
            .get_by_reference(Provider::Veriff, &reference)
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id(), user_id);

        // Same reference under a different provider does not resolve.
        assert!(store
            .get_by_reference(Provider::Onfido, &reference)
            .unwrap()
            .is_none());
    }

    #[test]
    fn reference_uniqueness_is_enforced_across_users() {
        let store = InMemoryRecordStore::new();

        store
            .upsert(bound_record(UserId::new(), "ref-1"), ExpectedVersion::Exact(0))
            .unwrap();
        let err = store
            .upsert(bound_record(UserId::new(), "ref-1"), ExpectedVersion::Exact(0))
            .unwrap_err();
        assert!(matches!(err, StoreError::ReferenceTaken(_)));
    }

    #[test]
    fn rebinding_releases_the_old_reference() {
        let store = InMemoryRecordStore::new();
        let user_id = UserId::new();

        let stored = store
            .upsert(bound_record(user_id, "ref-1"), ExpectedVersion::Exact(0))
            .unwrap();

        let mut rebound = stored;
        rebound
            .bind_session(
                Provider::Veriff,
                ProviderReference::new("ref-2").unwrap(),
                Utc::now(),
            )
            .unwrap();
        store
            .upsert(rebound.clone(), ExpectedVersion::Exact(rebound.version()))
            .unwrap();

        let old = ProviderReference::new("ref-1").unwrap();
        assert!(store
            .get_by_reference(Provider::Veriff, &old)
            .unwrap()
            .is_none());

        // The released reference may now be claimed by another record.
        store
            .upsert(bound_record(UserId::new(), "ref-1"), ExpectedVersion::Exact(0))
            .unwrap();
    }

    #[test]
    fn whitespace_only_vendor_reason_is_defaulted_before_the_write_path() {
        let store = InMemoryRecordStore::new();
        let mut record = new_record(UserId::new());
        record.apply_provider_status(
            veriflow_provider::ReportedStatus::Rejected,
            Some("  ".to_string()),
            Utc::now(),
        );

        // A whitespace-only reason would break the iff invariant at the
        // store's validation; the record substitutes a default instead.
        let stored = store.upsert(record, ExpectedVersion::Exact(0)).unwrap();
        assert_eq!(stored.rejection_reason().unwrap(), "rejected by provider");
    }
}
