use core::str::FromStr;

use serde::{Deserialize, Serialize};

use veriflow_core::DomainError;

/// Supported external verification vendors.
///
/// A record is bound to exactly one provider for its lifetime; the engine
/// never verifies against multiple vendors simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Veriff,
    Onfido,
    Sumsub,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Veriff => "veriff",
            Self::Onfido => "onfido",
            Self::Sumsub => "sumsub",
        }
    }
}

impl core::fmt::Display for Provider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "veriff" => Ok(Self::Veriff),
            "onfido" => Ok(Self::Onfido),
            "sumsub" => Ok(Self::Sumsub),
            other => Err(DomainError::invalid_input(format!(
                "unsupported provider: {other}"
            ))),
        }
    }
}

/// Vendor-assigned session/applicant identifier.
///
/// Once bound to a record, the `(provider, reference)` pair is the join key
/// used to resolve inbound callbacks and on-demand status fetches. It is
/// unique per provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderReference(String);

impl ProviderReference {
    pub fn new(reference: impl Into<String>) -> Result<Self, DomainError> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(DomainError::invalid_input("provider reference is empty"));
        }
        Ok(Self(reference))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProviderReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_known_vendors_case_insensitively() {
        assert_eq!("veriff".parse::<Provider>().unwrap(), Provider::Veriff);
        assert_eq!("Onfido".parse::<Provider>().unwrap(), Provider::Onfido);
        assert_eq!(" SUMSUB ".parse::<Provider>().unwrap(), Provider::Sumsub);
    }

    #[test]
    fn unknown_vendor_is_invalid_input() {
        let err = "jumio".parse::<Provider>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn empty_reference_is_rejected() {
        assert!(ProviderReference::new("  ").is_err());
        assert_eq!(ProviderReference::new("r1").unwrap().as_str(), "r1");
    }
}
