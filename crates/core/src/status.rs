//! Verification status lifecycle.

use serde::{Deserialize, Serialize};

/// Status of a user's verification record.
///
/// Transitions: `NotSubmitted → Pending → {Verified, Rejected}`, with
/// resubmission re-entering `Pending` from `Rejected`. `Verified` is terminal
/// for the normal flow; only an attributed admin override leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Virtual status: no record exists yet. Never persisted.
    NotSubmitted,
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    /// Whether a provider decision has been reached.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }

    /// Whether this status may be written to the record store.
    ///
    /// `NotSubmitted` is a view-layer fiction for absent records.
    pub fn is_persistable(self) -> bool {
        !matches!(self, Self::NotSubmitted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotSubmitted => "not_submitted",
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl core::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
