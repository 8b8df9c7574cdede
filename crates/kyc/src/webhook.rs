//! Callback (webhook) payload parsing.
//!
//! Parsing happens **after** signature verification, and always from the
//! same raw bytes the signature was computed over.

use serde::Deserialize;

use veriflow_core::{DomainError, DomainResult};

/// Parsed provider callback body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub reference_id: String,
    pub status: String,
    #[serde(default)]
    pub reject_reason: Option<String>,
}

impl CallbackPayload {
    /// Parse a raw callback body.
    ///
    /// A missing or empty `referenceId` is user-visible as bad input; the
    /// exact parse failure is only logged server-side.
    pub fn parse(raw_body: &[u8]) -> DomainResult<Self> {
        let payload: Self = serde_json::from_slice(raw_body).map_err(|e| {
            tracing::warn!(error = %e, "malformed callback body");
            DomainError::invalid_input("malformed callback body")
        })?;

        if payload.reference_id.trim().is_empty() {
            return Err(DomainError::invalid_input("callback is missing referenceId"));
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_payload() {
        let raw = br#"{"referenceId":"r1","status":"declined","rejectReason":"blurry"}"#;
        let payload = CallbackPayload::parse(raw).unwrap();

        assert_eq!(payload.reference_id, "r1");
        assert_eq!(payload.status, "declined");
        assert_eq!(payload.reject_reason.as_deref(), Some("blurry"));
    }

    #[test]
    fn reject_reason_is_optional() {
        let raw = br#"{"referenceId":"r1","status":"approved"}"#;
        let payload = CallbackPayload::parse(raw).unwrap();
        assert!(payload.reject_reason.is_none());
    }

    #[test]
    fn missing_or_empty_reference_is_invalid_input() {
        for raw in [
            br#"{"status":"approved"}"#.as_slice(),
            br#"{"referenceId":"","status":"approved"}"#.as_slice(),
            b"not json".as_slice(),
        ] {
            let err = CallbackPayload::parse(raw).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)));
        }
    }
}
