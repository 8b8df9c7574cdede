use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use veriflow_core::{RecordId, UserId, VerificationStatus};

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionCause {
    UserSubmission,
    ProviderWebhook,
    AdminSync,
    AdminOverride,
}

impl TransitionCause {
    /// Stable cause name (e.g. "provider-webhook").
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserSubmission => "user-submission",
            Self::ProviderWebhook => "provider-webhook",
            Self::AdminSync => "admin-sync",
            Self::AdminOverride => "admin-override",
        }
    }
}

impl core::fmt::Display for TransitionCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who drove a transition.
///
/// The webhook path is authenticated by signature rather than caller
/// identity, so it is attributed to the provider, not to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum AuditActor {
    User(UserId),
    Admin(UserId),
    ProviderWebhook,
}

/// An audit trail entry: one status transition on one record.
///
/// Audit events are:
/// - **immutable** (treat them as facts)
/// - designed to be **append-only**
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub record_id: RecordId,
    /// Owner of the record (not necessarily the actor).
    pub user_id: UserId,
    pub actor: AuditActor,
    pub cause: TransitionCause,
    pub from: VerificationStatus,
    pub to: VerificationStatus,
    /// When the transition occurred (business time).
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        record_id: RecordId,
        user_id: UserId,
        actor: AuditActor,
        cause: TransitionCause,
        from: VerificationStatus,
        to: VerificationStatus,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            record_id,
            user_id,
            actor,
            cause,
            from,
            to,
            occurred_at,
        }
    }
}
