//! Collected client data.
//!
//! The client data is the JSON document the browser assembles around a
//! ceremony: the ceremony type, the echoed challenge, and the origin the
//! request was made from. The authenticator signs over its SHA-256 hash, so
//! its decoded members are the client-attested half of every assertion.

use serde::Deserialize;

use crate::challenge::Challenge;
use crate::error::{Result, ValidationError};

/// The ceremony a client data document was collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyType {
    /// `webauthn.get` - an authentication assertion.
    Get,
    /// `webauthn.create` - a registration (attestation) ceremony.
    Create,
}

impl CeremonyType {
    fn from_declared(value: &str) -> Option<Self> {
        match value {
            "webauthn.get" => Some(Self::Get),
            "webauthn.create" => Some(Self::Create),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawClientData {
    #[serde(rename = "type")]
    type_: String,
    challenge: String,
    origin: String,
    #[serde(rename = "crossOrigin", default)]
    cross_origin: bool,
}

/// Decoded client data for one assertion.
///
/// Unknown members are ignored on decode, as the protocol requires; the raw
/// payload (not this decoded form) is what the signature covers.
#[derive(Debug)]
pub struct CollectedClientData {
    /// The declared ceremony type string, verbatim.
    pub declared_type: String,
    /// The echoed challenge.
    pub challenge: Challenge,
    /// The origin the client made the request from.
    pub origin: String,
    /// Whether the request crossed an iframe boundary.
    pub cross_origin: bool,
}

impl CollectedClientData {
    /// Decode the raw client-data JSON payload.
    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        let raw: RawClientData = serde_json::from_slice(payload)
            .map_err(|e| ValidationError::Decode(format!("client data is not valid JSON: {e}")))?;
        let challenge = Challenge::from_base64url(&raw.challenge)?;
        Ok(Self {
            declared_type: raw.type_,
            challenge,
            origin: raw.origin,
            cross_origin: raw.cross_origin,
        })
    }

    /// The declared ceremony type, if it is one the protocol defines.
    pub fn ceremony_type(&self) -> Option<CeremonyType> {
        CeremonyType::from_declared(&self.declared_type)
    }

    /// Check that this document was collected for the expected ceremony.
    ///
    /// A registration document presented at authentication time is
    /// attacker-shaped, not merely malformed, and is reported as such.
    pub fn require_ceremony(&self, expected: CeremonyType) -> Result<()> {
        if self.ceremony_type() == Some(expected) {
            Ok(())
        } else {
            tracing::debug!(declared = %self.declared_type, "client data declares wrong ceremony type");
            Err(ValidationError::MaliciousData(self.declared_type.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_data_json(type_: &str) -> Vec<u8> {
        format!(
            r#"{{"type":"{type_}","challenge":"AQIDBA","origin":"https://example.com","extra":true}}"#
        )
        .into_bytes()
    }

    #[test]
    fn test_decode_authentication_client_data() {
        let data = CollectedClientData::from_bytes(&client_data_json("webauthn.get")).unwrap();
        assert_eq!(data.ceremony_type(), Some(CeremonyType::Get));
        assert_eq!(data.challenge.as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(data.origin, "https://example.com");
        assert!(!data.cross_origin);
    }

    #[test]
    fn test_registration_type_fails_ceremony_check() {
        let data = CollectedClientData::from_bytes(&client_data_json("webauthn.create")).unwrap();
        let err = data.require_ceremony(CeremonyType::Get).unwrap_err();
        assert!(matches!(err, ValidationError::MaliciousData(t) if t == "webauthn.create"));
    }

    #[test]
    fn test_unknown_type_fails_ceremony_check() {
        let data = CollectedClientData::from_bytes(&client_data_json("webauthn.unknown")).unwrap();
        assert_eq!(data.ceremony_type(), None);
        assert!(data.require_ceremony(CeremonyType::Get).is_err());
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = CollectedClientData::from_bytes(b"{not json").unwrap_err();
        assert!(matches!(err, ValidationError::Decode(_)));
    }

    #[test]
    fn test_missing_member_is_decode_error() {
        let err = CollectedClientData::from_bytes(br#"{"type":"webauthn.get"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::Decode(_)));
    }
}
