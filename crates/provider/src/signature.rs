//! Callback signature verification.
//!
//! Inbound webhooks are authenticated by a keyed digest over the request
//! body, computed with a secret shared with the provider. Verification must
//! run over the **exact raw bytes received**: re-serializing parsed JSON
//! before hashing changes the bytes and breaks the check, so callers pass
//! the body through as `&[u8]` untouched.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Signature verification failure.
///
/// One opaque variant on purpose: the caller (and therefore the response
/// surface) must not learn whether the header was malformed, missing, or
/// simply wrong.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature verification failed")]
    Invalid,
}

/// HMAC-SHA256 verifier for provider callbacks.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Vec<u8>,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify a hex-encoded digest against the raw request body.
    ///
    /// The comparison is constant-time (`Mac::verify_slice`), so a forged
    /// header learns nothing from response timing.
    pub fn verify(&self, raw_body: &[u8], signature_hex: &str) -> Result<(), SignatureError> {
        let claimed = hex::decode(signature_hex.trim()).map_err(|_| SignatureError::Invalid)?;

        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|_| SignatureError::Invalid)?;
        mac.update(raw_body);
        mac.verify_slice(&claimed).map_err(|_| SignatureError::Invalid)
    }

    /// Compute the hex digest for a body.
    ///
    /// Used by tests and by outbound calls that the provider verifies with
    /// the same shared secret.
    pub fn sign(&self, raw_body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("hmac accepts keys of any length"));
        mac.update(raw_body);
        hex::encode(mac.finalize().into_bytes())
    }
}

impl core::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Never expose the secret, not even in debug output.
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_verifies() {
        let verifier = WebhookVerifier::new(b"shared-secret".to_vec());
        let body = br#"{"referenceId":"r1","status":"approved"}"#;

        let digest = verifier.sign(body);
        assert!(verifier.verify(body, &digest).is_ok());
    }

    #[test]
    fn tampered_body_fails_with_stale_signature() {
        let verifier = WebhookVerifier::new(b"shared-secret".to_vec());
        let digest = verifier.sign(br#"{"referenceId":"r1","status":"declined"}"#);

        let tampered = br#"{"referenceId":"r1","status":"approved"}"#;
        assert_eq!(
            verifier.verify(tampered, &digest),
            Err(SignatureError::Invalid)
        );
    }

    #[test]
    fn wrong_secret_fails() {
        let body = b"payload";
        let digest = WebhookVerifier::new(b"secret-a".to_vec()).sign(body);

        let other = WebhookVerifier::new(b"secret-b".to_vec());
        assert_eq!(other.verify(body, &digest), Err(SignatureError::Invalid));
    }

    #[test]
    fn malformed_hex_fails_opaquely() {
        let verifier = WebhookVerifier::new(b"shared-secret".to_vec());
        assert_eq!(
            verifier.verify(b"payload", "not-hex"),
            Err(SignatureError::Invalid)
        );
        assert_eq!(verifier.verify(b"payload", ""), Err(SignatureError::Invalid));
    }

    #[test]
    fn reencoded_json_does_not_verify() {
        // The documented pitfall: hashing a re-serialized body instead of
        // the raw bytes silently changes whitespace and key order.
        let verifier = WebhookVerifier::new(b"shared-secret".to_vec());
        let raw = br#"{ "status": "approved", "referenceId": "r1" }"#;
        let digest = verifier.sign(raw);

        let reencoded: serde_json::Value = serde_json::from_slice(raw).unwrap();
        let reencoded = serde_json::to_vec(&reencoded).unwrap();
        assert_ne!(raw.as_slice(), reencoded.as_slice());
        assert_eq!(
            verifier.verify(&reencoded, &digest),
            Err(SignatureError::Invalid)
        );
    }
}
