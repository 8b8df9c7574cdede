//! User-supplied submission data and its validation.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use veriflow_core::{DomainError, DomainResult, ValueObject};

/// Accepted identity document kinds. Closed set: anything else is rejected
/// at the schema level, not passed through to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Passport,
    DriversLicense,
    NationalId,
    ResidencePermit,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::DriversLicense => "drivers_license",
            Self::NationalId => "national_id",
            Self::ResidencePermit => "residence_permit",
        }
    }
}

impl core::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "passport" => Ok(Self::Passport),
            "drivers_license" => Ok(Self::DriversLicense),
            "national_id" => Ok(Self::NationalId),
            "residence_permit" => Ok(Self::ResidencePermit),
            other => Err(DomainError::invalid_input(format!(
                "unsupported document type: {other}"
            ))),
        }
    }
}

impl ValueObject for DocumentType {}

/// ISO 3166-1 alpha-2 country code, stored uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl AsRef<str>) -> DomainResult<Self> {
        let code = code.as_ref().trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::invalid_input(format!(
                "country must be an ISO 3166-1 alpha-2 code, got: {code:?}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for CountryCode {}

/// Validated submission payload, immutable once the record is verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionData {
    pub document_type: DocumentType,
    pub country: CountryCode,
}

impl ValueObject for SubmissionData {}

/// Raw submission input as received from the caller, prior to validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub document_type: String,
    pub country: String,
}

impl SubmissionRequest {
    /// Strict schema validation. Failures are user-correctable
    /// (`InvalidInput`), never a server error.
    pub fn validate(&self) -> DomainResult<SubmissionData> {
        Ok(SubmissionData {
            document_type: self.document_type.parse()?,
            country: CountryCode::new(&self.country)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_request_passes_validation() {
        let request = SubmissionRequest {
            document_type: "passport".to_string(),
            country: "us".to_string(),
        };

        let data = request.validate().unwrap();
        assert_eq!(data.document_type, DocumentType::Passport);
        assert_eq!(data.country.as_str(), "US");
    }

    #[test]
    fn unknown_document_type_is_invalid_input() {
        let request = SubmissionRequest {
            document_type: "library_card".to_string(),
            country: "US".to_string(),
        };

        let err = request.validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn malformed_country_codes_are_rejected() {
        for bad in ["USA", "U", "", "1A", "u s"] {
            assert!(CountryCode::new(bad).is_err(), "accepted {bad:?}");
        }
    }
}
