use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use veriflow_core::{DomainError, UserId};

use crate::vendor::ProviderReference;

/// A hosted verification session issued by the provider.
///
/// `expires_at` is provider-supplied and advisory only: the engine does not
/// purge expired sessions, it simply stops trusting a stale reference once
/// the user is issued a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub reference: ProviderReference,
    pub redirect_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Current provider-side truth for a reference.
///
/// `vendor_status` is raw vendor vocabulary; callers normalize it through
/// [`crate::map_vendor_status`] before acting on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub vendor_status: String,
    pub reject_reason: Option<String>,
}

/// Provider gateway failure.
///
/// All variants are retryable from the caller's perspective and must never
/// be folded into a verification decision: a timed-out status fetch is not a
/// rejection.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("provider request timed out")]
    Timeout,

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider protocol error: {0}")]
    Protocol(String),
}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        // Gateway failures are retryable and must never be folded into a
        // local verification decision.
        DomainError::upstream(err.to_string())
    }
}

/// Narrow contract to the external verification provider.
///
/// Calls are external network operations: implementations are expected to be
/// time-bounded and cancellable. Retry/backoff is the surrounding client
/// wrapper's responsibility, not modeled here.
pub trait ProviderGateway: Send + Sync {
    /// Start a hosted verification session for a user.
    fn start_session(&self, user_id: UserId, redirect_url: &str) -> Result<Session, GatewayError>;

    /// Fetch the provider's current truth for a previously issued reference.
    fn fetch_status(&self, reference: &ProviderReference) -> Result<StatusReport, GatewayError>;
}

impl<G> ProviderGateway for Arc<G>
where
    G: ProviderGateway + ?Sized,
{
    fn start_session(&self, user_id: UserId, redirect_url: &str) -> Result<Session, GatewayError> {
        (**self).start_session(user_id, redirect_url)
    }

    fn fetch_status(&self, reference: &ProviderReference) -> Result<StatusReport, GatewayError> {
        (**self).fetch_status(reference)
    }
}
