//! The verification record and its state machine.
//!
//! Decision logic lives here as pure methods on the record; the engine
//! orchestrates policy checks, provider calls, persistence and audit around
//! them. No method performs IO.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use veriflow_core::{DomainError, DomainResult, Entity, RecordId, UserId, VerificationStatus};
use veriflow_provider::{Provider, ProviderReference, ReportedStatus};

use crate::submission::SubmissionData;

/// A status change that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: VerificationStatus,
    pub to: VerificationStatus,
}

impl Transition {
    /// Whether the status itself moved (a same-status write that only
    /// refreshes data does not count as a transition for audit purposes).
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Result of applying provider truth to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// The record moved to the reported status.
    Applied(Transition),
    /// The record was already at the reported status. Idempotent replay.
    NoChange,
    /// The provider reported a non-verified status for a verified record.
    /// Provider paths never regress out of `Verified`; only an attributed
    /// admin override may do that.
    KeptVerified,
}

/// The sole entity: one verification record per user.
///
/// Records are never hard-deleted; together with the audit trail they form
/// the compliance record of every verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    id: RecordId,
    user_id: UserId,
    status: VerificationStatus,
    provider: Option<Provider>,
    provider_reference: Option<ProviderReference>,
    submission: Option<SubmissionData>,
    rejection_reason: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
    reviewed_at: Option<DateTime<Utc>>,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Store-assigned version for optimistic concurrency. 0 = never persisted.
    version: u64,
}

impl VerificationRecord {
    /// Create a record from a first submission. Enters `Pending` and stamps
    /// `submitted_at`.
    pub fn new_submission(user_id: UserId, data: SubmissionData, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            user_id,
            status: VerificationStatus::Pending,
            provider: None,
            provider_reference: None,
            submission: Some(data),
            rejection_reason: None,
            submitted_at: Some(now),
            reviewed_at: None,
            verified_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Create a record for a user who starts a provider session before
    /// submitting document data. A session must be bound to a persisted
    /// record and `NotSubmitted` is never persisted, so this also enters
    /// `Pending` (stamping `submitted_at` at that first entry).
    pub fn new_for_session(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            user_id,
            status: VerificationStatus::Pending,
            provider: None,
            provider_reference: None,
            submission: None,
            rejection_reason: None,
            submitted_at: Some(now),
            reviewed_at: None,
            verified_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> RecordId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    pub fn provider(&self) -> Option<Provider> {
        self.provider
    }

    pub fn provider_reference(&self) -> Option<&ProviderReference> {
        self.provider_reference.as_ref()
    }

    pub fn submission(&self) -> Option<&SubmissionData> {
        self.submission.as_ref()
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Resubmission: re-enters `Pending`, replaces the submission data and
    /// clears any prior rejection reason. The original `submitted_at` is
    /// preserved across resubmissions (compliance audits care about the
    /// initial attempt date).
    ///
    /// A verified record cannot be silently overwritten: submitting while
    /// `Verified` is a conflict and leaves the record untouched.
    pub fn resubmit(
        &mut self,
        data: SubmissionData,
        now: DateTime<Utc>,
    ) -> DomainResult<Transition> {
        if self.status == VerificationStatus::Verified {
            return Err(DomainError::conflict(
                "record is already verified; submission refused",
            ));
        }

        let from = self.status;
        self.status = VerificationStatus::Pending;
        self.submission = Some(data);
        self.rejection_reason = None;
        self.submitted_at.get_or_insert(now);
        self.updated_at = now;

        Ok(Transition {
            from,
            to: self.status,
        })
    }

    /// Guard: a hosted session may only be started for a pending record.
    ///
    /// A verified user may not start a new session, and a rejected record
    /// must go back through resubmission first so the rejection is cleared
    /// through the ordinary transition, not sidestepped by a fresh session.
    pub fn ensure_session_allowed(&self) -> DomainResult<()> {
        match self.status {
            VerificationStatus::Pending => Ok(()),
            VerificationStatus::Verified => Err(DomainError::conflict(
                "record is already verified; cannot start a new session",
            )),
            _ => Err(DomainError::conflict(
                "record is rejected; resubmit before starting a new session",
            )),
        }
    }

    /// Bind a provider session to this record.
    ///
    /// Re-initiation overwrites the previous reference; a stale reference is
    /// never trusted again and never reused.
    pub fn bind_session(
        &mut self,
        provider: Provider,
        reference: ProviderReference,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_session_allowed()?;

        self.provider = Some(provider);
        self.provider_reference = Some(reference);
        self.updated_at = now;
        Ok(())
    }

    /// Apply provider truth (from a callback or an on-demand sync).
    ///
    /// Below `Verified` the record converges to the reported status, so a
    /// replayed callback and a later sync arrive at the same end state.
    /// `Verified` never regresses on a provider path.
    pub fn apply_provider_status(
        &mut self,
        reported: ReportedStatus,
        reject_reason: Option<String>,
        now: DateTime<Utc>,
    ) -> ProviderOutcome {
        let target = match reported {
            ReportedStatus::Approved => VerificationStatus::Verified,
            ReportedStatus::Rejected => VerificationStatus::Rejected,
            ReportedStatus::Pending => VerificationStatus::Pending,
        };

        if self.status == target {
            return ProviderOutcome::NoChange;
        }
        if self.status == VerificationStatus::Verified {
            return ProviderOutcome::KeptVerified;
        }

        let from = self.status;
        self.status = target;
        match target {
            VerificationStatus::Verified => {
                self.rejection_reason = None;
                self.verified_at.get_or_insert(now);
                self.reviewed_at.get_or_insert(now);
            }
            VerificationStatus::Rejected => {
                self.rejection_reason = Some(
                    reject_reason
                        .filter(|r| !r.trim().is_empty())
                        .unwrap_or_else(|| "rejected by provider".to_string()),
                );
                self.reviewed_at.get_or_insert(now);
            }
            VerificationStatus::Pending => {
                // Provider walked a rejection back to in-progress.
                self.rejection_reason = None;
            }
            VerificationStatus::NotSubmitted => unreachable!("no reported status maps here"),
        }
        self.updated_at = now;

        ProviderOutcome::Applied(Transition { from, to: target })
    }

    /// Manual admin correction. The one path that may move a record out of
    /// `Verified`; the engine audits it with the admin's identity.
    ///
    /// `reason` is required iff the target is `Rejected`.
    pub fn admin_override(
        &mut self,
        target: VerificationStatus,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Transition> {
        if !target.is_persistable() {
            return Err(DomainError::invalid_input(
                "cannot set the virtual not_submitted status",
            ));
        }

        let reason = reason.filter(|r| !r.trim().is_empty());
        match (target, &reason) {
            (VerificationStatus::Rejected, None) => {
                return Err(DomainError::invalid_input(
                    "rejection requires a rejection reason",
                ));
            }
            (VerificationStatus::Rejected, Some(_)) => {}
            (_, Some(_)) => {
                return Err(DomainError::invalid_input(
                    "rejection reason is only valid when rejecting",
                ));
            }
            (_, None) => {}
        }

        let from = self.status;
        self.status = target;
        match target {
            VerificationStatus::Verified => {
                self.rejection_reason = None;
                self.verified_at.get_or_insert(now);
                self.reviewed_at.get_or_insert(now);
            }
            VerificationStatus::Rejected => {
                self.rejection_reason = reason;
                self.reviewed_at.get_or_insert(now);
            }
            VerificationStatus::Pending => {
                self.rejection_reason = None;
            }
            VerificationStatus::NotSubmitted => unreachable!("rejected above"),
        }
        self.updated_at = now;

        Ok(Transition { from, to: target })
    }

    /// Record-level invariants, enforced on every write path by the store.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.status.is_persistable() {
            return Err(DomainError::internal(
                "virtual not_submitted status must never be persisted",
            ));
        }

        let rejected = self.status == VerificationStatus::Rejected;
        let has_reason = self
            .rejection_reason
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        if rejected != has_reason {
            return Err(DomainError::internal(
                "rejection_reason must be present iff status is rejected",
            ));
        }

        if self.provider.is_some() != self.provider_reference.is_some() {
            return Err(DomainError::internal(
                "provider and provider_reference must be set together",
            ));
        }

        Ok(())
    }
}

impl Entity for VerificationRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
