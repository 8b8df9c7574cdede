//! Vendor status vocabulary normalization.

use serde::{Deserialize, Serialize};

use crate::vendor::Provider;

/// Normalized provider verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportedStatus {
    Approved,
    Rejected,
    /// Still in progress, or an unrecognized vendor string.
    Pending,
}

/// Map a raw vendor status string to a normalized verdict.
///
/// Total function: every input maps to something, and the default branch is
/// `Pending` so new or misspelled vendor strings fail closed. Nothing maps
/// to `Approved` unless it is a known approval term for that vendor.
pub fn map_vendor_status(provider: Provider, raw: &str) -> ReportedStatus {
    let normalized = raw.trim().to_ascii_lowercase();

    match provider {
        Provider::Veriff => match normalized.as_str() {
            "approved" => ReportedStatus::Approved,
            "declined" | "expired" | "abandoned" => ReportedStatus::Rejected,
            // "started", "submitted", "resubmission_requested", anything new.
            _ => ReportedStatus::Pending,
        },
        Provider::Onfido => match normalized.as_str() {
            "clear" => ReportedStatus::Approved,
            "consider" | "rejected" | "withdrawn" => ReportedStatus::Rejected,
            _ => ReportedStatus::Pending,
        },
        Provider::Sumsub => match normalized.as_str() {
            "green" => ReportedStatus::Approved,
            "red" => ReportedStatus::Rejected,
            _ => ReportedStatus::Pending,
        },
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn known_approval_terms_map_to_approved() {
        assert_eq!(
            map_vendor_status(Provider::Veriff, "approved"),
            ReportedStatus::Approved
        );
        assert_eq!(
            map_vendor_status(Provider::Onfido, "clear"),
            ReportedStatus::Approved
        );
        assert_eq!(
            map_vendor_status(Provider::Sumsub, "GREEN"),
            ReportedStatus::Approved
        );
    }

    #[test]
    fn known_rejection_terms_map_to_rejected() {
        assert_eq!(
            map_vendor_status(Provider::Veriff, "declined"),
            ReportedStatus::Rejected
        );
        assert_eq!(
            map_vendor_status(Provider::Onfido, "consider"),
            ReportedStatus::Rejected
        );
        assert_eq!(
            map_vendor_status(Provider::Sumsub, "red"),
            ReportedStatus::Rejected
        );
    }

    #[test]
    fn in_progress_terms_stay_pending() {
        assert_eq!(
            map_vendor_status(Provider::Veriff, "resubmission_requested"),
            ReportedStatus::Pending
        );
        assert_eq!(
            map_vendor_status(Provider::Sumsub, "onHold"),
            ReportedStatus::Pending
        );
    }

    proptest! {
        /// Unknown vendor strings must fail closed: an arbitrary string only
        /// maps to `Approved` if it normalizes to a known approval term.
        #[test]
        fn arbitrary_strings_never_approve_by_accident(raw in ".*") {
            let approval_terms = ["approved", "clear", "green"];
            for provider in [Provider::Veriff, Provider::Onfido, Provider::Sumsub] {
                let mapped = map_vendor_status(provider, &raw);
                if mapped == ReportedStatus::Approved {
                    let normalized = raw.trim().to_ascii_lowercase();
                    prop_assert!(approval_terms.contains(&normalized.as_str()));
                }
            }
        }
    }
}
