//! The verification engine: orchestration of policy, store, gateway,
//! signature verification and audit around the record state machine.
//!
//! The engine holds no shared mutable state of its own; correctness under
//! concurrent callers rests on the store's per-record version check. All
//! collaborators are injected at construction.
//!
//! Resubmission from `Pending`/`Rejected` is deliberately uncapped and has
//! no cool-down; the upstream behavior never enforced one and inventing a
//! limit here would change user-visible semantics.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use veriflow_audit::{AuditActor, AuditEvent, AuditTrail, TransitionCause};
use veriflow_auth::{can_read, can_submit, require_admin, Actor};
use veriflow_core::{DomainError, DomainResult, ExpectedVersion, UserId, VerificationStatus};
use veriflow_provider::{
    map_vendor_status, Provider, ProviderGateway, ProviderReference, ReportedStatus, Session,
    WebhookVerifier,
};

use crate::record::{ProviderOutcome, Transition, VerificationRecord};
use crate::redirect::RedirectPolicy;
use crate::store::RecordStore;
use crate::submission::SubmissionRequest;
use crate::webhook::CallbackPayload;

/// The core orchestrator. One instance serves all users; no operation
/// blocks on another user's record.
pub struct VerificationEngine<S, G, A> {
    store: S,
    gateway: G,
    verifier: WebhookVerifier,
    audit: A,
    redirect_policy: RedirectPolicy,
}

impl<S, G, A> VerificationEngine<S, G, A>
where
    S: RecordStore,
    G: ProviderGateway,
    A: AuditTrail,
{
    pub fn new(store: S, gateway: G, verifier: WebhookVerifier, audit: A) -> Self {
        Self {
            store,
            gateway,
            verifier,
            audit,
            redirect_policy: RedirectPolicy::default(),
        }
    }

    pub fn with_redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.redirect_policy = policy;
        self
    }

    /// The record owned by `user_id`, if the actor may read it.
    ///
    /// `Ok(None)` means no record exists yet; callers render that as the
    /// virtual `NotSubmitted` status.
    pub fn record_for(
        &self,
        actor: &Actor,
        user_id: UserId,
    ) -> DomainResult<Option<VerificationRecord>> {
        if !can_read(actor, user_id) {
            return Err(DomainError::Forbidden);
        }
        Ok(self.store.get_by_user(user_id)?)
    }

    /// Current status for a user, including the virtual `NotSubmitted`.
    pub fn status_of(&self, actor: &Actor, user_id: UserId) -> DomainResult<VerificationStatus> {
        Ok(self
            .record_for(actor, user_id)?
            .map(|record| record.status())
            .unwrap_or(VerificationStatus::NotSubmitted))
    }

    /// Submit (or resubmit) verification data.
    pub fn submit(
        &self,
        actor: &Actor,
        user_id: UserId,
        request: &SubmissionRequest,
    ) -> DomainResult<VerificationRecord> {
        if !can_submit(actor, user_id) {
            return Err(DomainError::Forbidden);
        }
        let data = request.validate()?;
        let now = Utc::now();

        match self.store.get_by_user(user_id)? {
            None => {
                let record = VerificationRecord::new_submission(user_id, data, now);
                let transition = Transition {
                    from: VerificationStatus::NotSubmitted,
                    to: record.status(),
                };
                self.persist_and_audit(
                    record,
                    ExpectedVersion::Exact(0),
                    transition,
                    AuditActor::User(actor.id),
                    TransitionCause::UserSubmission,
                    now,
                )
            }
            Some(mut record) => {
                let expected = ExpectedVersion::Exact(record.version());
                let transition = record.resubmit(data, now)?;
                self.persist_and_audit(
                    record,
                    expected,
                    transition,
                    AuditActor::User(actor.id),
                    TransitionCause::UserSubmission,
                    now,
                )
            }
        }
    }

    /// Start a hosted verification session with the provider and bind the
    /// returned reference to the user's record.
    ///
    /// The session descriptor is returned to the caller unchanged;
    /// `expires_at` is advisory and nothing here purges expired sessions.
    pub fn initiate_verification(
        &self,
        actor: &Actor,
        user_id: UserId,
        provider: Provider,
        redirect_url: &str,
    ) -> DomainResult<Session> {
        if !can_submit(actor, user_id) {
            return Err(DomainError::Forbidden);
        }
        self.redirect_policy.validate(redirect_url)?;

        let existing = self.store.get_by_user(user_id)?;
        if let Some(record) = &existing {
            // Checked before the gateway call so an ineligible record never
            // triggers a session on the provider side. Only a pending record
            // (or no record at all) may start a session: verified users are
            // done, rejected users resubmit first.
            record.ensure_session_allowed()?;
        }

        let session = self.gateway.start_session(user_id, redirect_url)?;
        let now = Utc::now();

        let (mut record, expected, created) = match existing {
            Some(record) => {
                let expected = ExpectedVersion::Exact(record.version());
                (record, expected, false)
            }
            None => (
                VerificationRecord::new_for_session(user_id, now),
                ExpectedVersion::Exact(0),
                true,
            ),
        };
        record.bind_session(provider, session.reference.clone(), now)?;

        let transition = if created {
            Transition {
                from: VerificationStatus::NotSubmitted,
                to: record.status(),
            }
        } else {
            // Binding a reference is not a status transition.
            Transition {
                from: record.status(),
                to: record.status(),
            }
        };
        self.persist_and_audit(
            record,
            expected,
            transition,
            AuditActor::User(actor.id),
            TransitionCause::UserSubmission,
            now,
        )?;

        info!(
            %user_id,
            %provider,
            reference = %session.reference,
            "provider verification session started"
        );
        Ok(session)
    }

    /// Handle an inbound provider callback.
    ///
    /// `raw_body` must be the exact bytes received on the wire: the digest
    /// is recomputed over them before any parsing, and a re-serialized body
    /// will not verify.
    pub fn handle_callback(
        &self,
        provider: Provider,
        raw_body: &[u8],
        signature_hex: &str,
    ) -> DomainResult<VerificationRecord> {
        if self.verifier.verify(raw_body, signature_hex).is_err() {
            // Full context stays server-side; the caller learns nothing
            // about which check failed.
            warn!(%provider, "callback signature verification failed");
            return Err(DomainError::Forbidden);
        }

        let payload = CallbackPayload::parse(raw_body)?;
        let reference = ProviderReference::new(payload.reference_id)?;
        let reported = map_vendor_status(provider, &payload.status);

        let record = self
            .store
            .get_by_reference(provider, &reference)?
            .ok_or_else(|| {
                // The provider may retry with the same payload later, once
                // the reference is bound; reprocessing must stay safe.
                warn!(%provider, %reference, "callback reference did not resolve");
                DomainError::NotFound
            })?;

        self.apply_reported(
            record,
            reported,
            payload.reject_reason,
            AuditActor::ProviderWebhook,
            TransitionCause::ProviderWebhook,
        )
    }

    /// On-demand reconciliation against the provider's source of truth.
    ///
    /// Compensates for lost callbacks: given the same provider truth it
    /// arrives at the same state a callback would have produced. Returns
    /// `Ok(None)` when there is nothing to reconcile.
    pub fn sync_status(
        &self,
        actor: &Actor,
        user_id: UserId,
    ) -> DomainResult<Option<VerificationRecord>> {
        require_admin(actor)?;

        let Some(record) = self.store.get_by_user(user_id)? else {
            return Ok(None);
        };
        let Some(reference) = record.provider_reference().cloned() else {
            debug!(%user_id, "no provider reference; nothing to reconcile");
            return Ok(None);
        };
        let provider = record.provider().ok_or_else(|| {
            DomainError::internal("record has a provider reference but no provider")
        })?;

        // A gateway failure surfaces as retryable and mutates nothing.
        let report = self.gateway.fetch_status(&reference)?;
        let reported = map_vendor_status(provider, &report.vendor_status);

        let record = self.apply_reported(
            record,
            reported,
            report.reject_reason,
            AuditActor::Admin(actor.id),
            TransitionCause::AdminSync,
        )?;
        Ok(Some(record))
    }

    /// Manual admin correction of a record's status.
    ///
    /// The only path that may move a record out of `Verified`. Every
    /// override is audited with the admin's identity, even when the status
    /// does not change.
    pub fn admin_override(
        &self,
        actor: &Actor,
        user_id: UserId,
        target: VerificationStatus,
        rejection_reason: Option<String>,
    ) -> DomainResult<VerificationRecord> {
        require_admin(actor)?;

        let mut record = self
            .store
            .get_by_user(user_id)?
            .ok_or(DomainError::NotFound)?;
        let expected = ExpectedVersion::Exact(record.version());
        let now = Utc::now();

        let transition = record.admin_override(target, rejection_reason, now)?;
        let stored = self.store.upsert(record, expected)?;
        self.append_audit(
            &stored,
            AuditActor::Admin(actor.id),
            TransitionCause::AdminOverride,
            transition,
            now,
        )?;

        info!(
            %user_id,
            admin = %actor.id,
            from = %transition.from,
            to = %transition.to,
            "admin override applied"
        );
        Ok(stored)
    }

    /// Apply normalized provider truth and persist the result.
    fn apply_reported(
        &self,
        mut record: VerificationRecord,
        reported: ReportedStatus,
        reject_reason: Option<String>,
        actor: AuditActor,
        cause: TransitionCause,
    ) -> DomainResult<VerificationRecord> {
        let expected = ExpectedVersion::Exact(record.version());
        let now = Utc::now();

        match record.apply_provider_status(reported, reject_reason, now) {
            ProviderOutcome::NoChange => {
                debug!(
                    user_id = %record.user_id(),
                    status = %record.status(),
                    %cause,
                    "provider status already reflected; idempotent no-op"
                );
                Ok(record)
            }
            ProviderOutcome::KeptVerified => {
                warn!(
                    user_id = %record.user_id(),
                    ?reported,
                    %cause,
                    "provider reported a non-verified status for a verified record; keeping verified"
                );
                Ok(record)
            }
            ProviderOutcome::Applied(transition) => self.persist_and_audit(
                record, expected, transition, actor, cause, now,
            ),
        }
    }

    fn persist_and_audit(
        &self,
        record: VerificationRecord,
        expected: ExpectedVersion,
        transition: Transition,
        actor: AuditActor,
        cause: TransitionCause,
        now: DateTime<Utc>,
    ) -> DomainResult<VerificationRecord> {
        let stored = self.store.upsert(record, expected)?;
        if transition.moved() {
            self.append_audit(&stored, actor, cause, transition, now)?;
            info!(
                user_id = %stored.user_id(),
                from = %transition.from,
                to = %transition.to,
                %cause,
                "verification status transition"
            );
        }
        Ok(stored)
    }

    fn append_audit(
        &self,
        record: &VerificationRecord,
        actor: AuditActor,
        cause: TransitionCause,
        transition: Transition,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.audit
            .append(AuditEvent::new(
                record.id_typed(),
                record.user_id(),
                actor,
                cause,
                transition.from,
                transition.to,
                now,
            ))
            .map_err(|e| {
                tracing::error!(error = %e, "audit append failed");
                DomainError::internal("audit append failed")
            })
    }
}
