//! Attestation metadata policy.
//!
//! Enrollment-time attestation processing is out of scope here, but the
//! stored record may carry attestation metadata that policy consults again
//! at authentication time (for example a self-attestation prohibition).
//! Each way that metadata can be unacceptable is reported as its own kind
//! rather than collapsed into a generic failure, because audit logging
//! distinguishes them.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Attestation statement formats registered for WebAuthn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttestationFormat {
    Packed,
    FidoU2f,
    Tpm,
    AndroidKey,
    AndroidSafetynet,
    Apple,
    None,
}

impl AttestationFormat {
    /// Parse a declared format identifier.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "packed" => Some(Self::Packed),
            "fido-u2f" => Some(Self::FidoU2f),
            "tpm" => Some(Self::Tpm),
            "android-key" => Some(Self::AndroidKey),
            "android-safetynet" => Some(Self::AndroidSafetynet),
            "apple" => Some(Self::Apple),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Attestation metadata captured at registration and stored with the
/// credential record.
#[derive(Debug, Clone)]
pub struct AttestationMetadata {
    /// Declared attestation statement format identifier, verbatim.
    pub format: String,
    /// Raw attestation statement (a CBOR map). Empty for format `none`.
    pub statement: Vec<u8>,
    /// Whether the statement was self-signed with the credential key rather
    /// than chained to an attestation CA.
    pub self_attested: bool,
}

/// Re-check stored attestation metadata against current policy.
pub fn check_attestation(
    metadata: &AttestationMetadata,
    prohibit_self_attestation: bool,
) -> Result<()> {
    let format = AttestationFormat::from_identifier(&metadata.format)
        .ok_or_else(|| ValidationError::UnsupportedAttestationFormat(metadata.format.clone()))?;

    if format != AttestationFormat::None {
        let statement = parse_statement(&metadata.statement)?;
        check_certificate_chain(&statement)?;
    }

    if metadata.self_attested && prohibit_self_attestation {
        return Err(ValidationError::SelfAttestationProhibited);
    }

    Ok(())
}

fn parse_statement(statement: &[u8]) -> Result<Vec<(Value, Value)>> {
    if statement.is_empty() {
        return Err(ValidationError::BadAttestationStatement(
            "statement is empty for a format that requires one".into(),
        ));
    }
    let value: Value = ciborium::from_reader(statement).map_err(|e| {
        ValidationError::BadAttestationStatement(format!("statement is not valid CBOR: {e}"))
    })?;
    match value {
        Value::Map(map) => Ok(map),
        _ => Err(ValidationError::BadAttestationStatement(
            "statement is not a CBOR map".into(),
        )),
    }
}

/// An `x5c` member, when present, must be a non-empty array of DER
/// certificate byte strings.
fn check_certificate_chain(statement: &[(Value, Value)]) -> Result<()> {
    let x5c = statement
        .iter()
        .find(|(k, _)| k.as_text() == Some("x5c"))
        .map(|(_, v)| v);
    let Some(x5c) = x5c else { return Ok(()) };

    let entries = x5c
        .as_array()
        .ok_or_else(|| ValidationError::CertificateError("x5c is not an array".into()))?;
    if entries.is_empty() {
        return Err(ValidationError::CertificateError(
            "x5c certificate chain is empty".into(),
        ));
    }
    for entry in entries {
        match entry.as_bytes() {
            Some(der) if !der.is_empty() => {}
            _ => {
                return Err(ValidationError::CertificateError(
                    "x5c entry is not a DER byte string".into(),
                ))
            }
        }
    }
    Ok(())
}
