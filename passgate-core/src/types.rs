//! Core data model for one assertion validation.

use std::collections::HashSet;

use url::Url;

use crate::attestation::AttestationMetadata;
use crate::authenticator_data::AuthenticatorData;
use crate::challenge::Challenge;
use crate::cose::CosePublicKey;
use crate::error::{Result, ValidationError};

/// An origin compared by exact scheme + host + port.
///
/// Ports are normalized through the scheme default, so `https://example.com`
/// and `https://example.com:443` are the same origin while
/// `https://example.com:8443` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Parse an origin from its serialized form.
    pub fn parse(text: &str) -> Result<Self> {
        let url = Url::parse(text)
            .map_err(|e| ValidationError::Decode(format!("origin {text} is not a URL: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| ValidationError::Decode(format!("origin {text} has no host")))?
            .to_string();
        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port_or_known_default(),
        })
    }

    /// The host component, which the relying party id is derived from when
    /// not configured explicitly.
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}://{}:{}", self.scheme, self.host, port),
            None => write!(f, "{}://{}", self.scheme, self.host),
        }
    }
}

/// The raw fields a client presents for one authentication attempt.
#[derive(Debug, Clone)]
pub struct AssertionRequest {
    /// Credential identifier the client claims to be answering with.
    pub credential_id: Vec<u8>,
    /// Raw client-data JSON payload (the bytes the signature hash covers).
    pub client_data: Vec<u8>,
    /// Raw authenticator-data payload.
    pub authenticator_data: Vec<u8>,
    /// Assertion signature bytes.
    pub signature: Vec<u8>,
    /// Client extension output JSON, if the client produced any.
    pub client_extension_outputs: Option<String>,
}

/// A stored, previously registered credential.
///
/// Owned by the external credential store; the validation pipeline treats it
/// as immutable input and reports counter updates outward instead of
/// mutating it.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// Credential identifier, unique per user.
    pub credential_id: Vec<u8>,
    /// COSE public key tagged with the registered algorithm.
    pub public_key: CosePublicKey,
    /// Signature counter observed at the last successful authentication.
    pub counter: u32,
    /// Attestation metadata captured at registration, when any was conveyed.
    pub attestation: Option<AttestationMetadata>,
}

/// Relying-party expectations for one ceremony.
#[derive(Debug)]
pub struct ServerContext {
    /// Acceptable origins (exact scheme+host+port membership).
    pub origins: Vec<Origin>,
    /// Relying party id; derived from the first origin's host when unset.
    pub rp_id: Option<String>,
    /// The challenge issued for this ceremony, if one is stored.
    pub challenge: Option<Challenge>,
    /// Whether the user-verified flag is mandatory for this attempt.
    pub user_verification_required: bool,
    /// Client extension identifiers the relying party declared it expects.
    pub expected_extension_ids: HashSet<String>,
    /// Whether policy rejects self-attested credentials.
    pub prohibit_self_attestation: bool,
}

impl ServerContext {
    /// The effective relying party id for this ceremony.
    pub fn effective_rp_id(&self) -> Result<&str> {
        if let Some(rp_id) = self.rp_id.as_deref() {
            return Ok(rp_id);
        }
        self.origins
            .first()
            .map(|origin| origin.host())
            .ok_or_else(|| ValidationError::Decode("no origin configured to derive rp id from".into()))
    }
}

/// A verified assertion: the flags the authenticator asserted and the
/// counter value the credential store must persist.
#[derive(Debug, Clone)]
pub struct VerifiedAssertion {
    /// Counter value to persist (the asserted one).
    pub counter: u32,
    /// Whether the authenticator asserted user verification.
    pub user_verified: bool,
    /// Parsed authenticator-data header, for callers that audit flags.
    pub authenticator_data: AuthenticatorData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_default_port_normalization() {
        let explicit = Origin::parse("https://example.com:443").unwrap();
        let implicit = Origin::parse("https://example.com").unwrap();
        assert_eq!(explicit, implicit);
    }

    #[test]
    fn test_origin_distinguishes_scheme_host_port() {
        let base = Origin::parse("https://example.com").unwrap();
        assert_ne!(base, Origin::parse("http://example.com").unwrap());
        assert_ne!(base, Origin::parse("https://other.example.com").unwrap());
        assert_ne!(base, Origin::parse("https://example.com:8443").unwrap());
    }

    #[test]
    fn test_rp_id_derived_from_first_origin() {
        let context = ServerContext {
            origins: vec![Origin::parse("https://app.example.com:8443").unwrap()],
            rp_id: None,
            challenge: None,
            user_verification_required: true,
            expected_extension_ids: HashSet::new(),
            prohibit_self_attestation: false,
        };
        assert_eq!(context.effective_rp_id().unwrap(), "app.example.com");
    }

    #[test]
    fn test_explicit_rp_id_wins() {
        let context = ServerContext {
            origins: vec![Origin::parse("https://app.example.com").unwrap()],
            rp_id: Some("example.com".into()),
            challenge: None,
            user_verification_required: true,
            expected_extension_ids: HashSet::new(),
            prohibit_self_attestation: false,
        };
        assert_eq!(context.effective_rp_id().unwrap(), "example.com");
    }
}
