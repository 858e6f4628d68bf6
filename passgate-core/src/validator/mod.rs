//! The assertion validation pipeline.
//!
//! An ordered set of independent checks over one (request, record, context)
//! triple, stopping at the first failure. Cheap structural checks run before
//! the asymmetric-signature verification so clearly bad input never pays
//! cryptographic cost; the counter check runs last because its failure means
//! an active cloning attack rather than a benign client error, and that
//! signal must not be masked by a cheaper failure.

pub mod challenge;
pub mod origin;
pub mod rp_id;

use std::collections::HashSet;

use aws_lc_rs::digest::{self, SHA256};

use crate::attestation::check_attestation;
use crate::authenticator_data::AuthenticatorData;
use crate::client_data::{CeremonyType, CollectedClientData};
use crate::error::{Result, ValidationError};
use crate::types::{AssertionRequest, CredentialRecord, ServerContext, VerifiedAssertion};

/// Validate one authentication assertion.
///
/// Pure function of its inputs: re-running it with the same record state
/// produces the same outcome, and a replayed request fails identically once
/// the stored counter has been advanced externally.
pub fn validate_assertion(
    request: &AssertionRequest,
    record: &CredentialRecord,
    context: &ServerContext,
) -> Result<VerifiedAssertion> {
    let client_data = CollectedClientData::from_bytes(&request.client_data)?;
    let authenticator_data = AuthenticatorData::from_bytes(&request.authenticator_data)?;

    challenge::validate(&client_data, context)?;
    origin::validate(&client_data.origin, &context.origins)?;
    rp_id::validate(&authenticator_data, context.effective_rp_id()?)?;
    client_data.require_ceremony(CeremonyType::Get)?;

    if !authenticator_data.user_present() {
        tracing::debug!("authentication failed: user-present flag not set");
        return Err(ValidationError::UserNotPresent);
    }
    if context.user_verification_required && !authenticator_data.user_verified() {
        tracing::debug!("authentication failed: user verification required but not asserted");
        return Err(ValidationError::UserNotVerified);
    }

    check_extensions(
        request.client_extension_outputs.as_deref(),
        &context.expected_extension_ids,
    )?;

    if let Some(metadata) = record.attestation.as_ref() {
        check_attestation(metadata, context.prohibit_self_attestation)?;
    }

    verify_signature(request, record)?;
    check_counter(record, authenticator_data.sign_count)?;

    Ok(VerifiedAssertion {
        counter: authenticator_data.sign_count,
        user_verified: authenticator_data.user_verified(),
        authenticator_data,
    })
}

/// Extension identifiers in the client response must be a subset of the
/// identifiers the relying party declared it expects.
fn check_extensions(outputs: Option<&str>, expected: &HashSet<String>) -> Result<()> {
    let Some(outputs) = outputs else { return Ok(()) };

    let value: serde_json::Value = serde_json::from_str(outputs)
        .map_err(|e| ValidationError::Decode(format!("extension output is not valid JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::Decode("extension output is not a JSON object".into()))?;

    for identifier in object.keys() {
        if !expected.contains(identifier) {
            tracing::debug!(extension = %identifier, "authentication failed: unexpected extension");
            return Err(ValidationError::ConstraintViolation(identifier.clone()));
        }
    }
    Ok(())
}

/// The signature covers `authenticator_data || SHA-256(client_data)`, over
/// the raw payloads as received.
fn verify_signature(request: &AssertionRequest, record: &CredentialRecord) -> Result<()> {
    let client_data_hash = digest::digest(&SHA256, &request.client_data);
    let mut signed_data =
        Vec::with_capacity(request.authenticator_data.len() + client_data_hash.as_ref().len());
    signed_data.extend_from_slice(&request.authenticator_data);
    signed_data.extend_from_slice(client_data_hash.as_ref());

    record.public_key.verify(&signed_data, &request.signature)
}

/// The asserted counter must be strictly greater than the stored one, unless
/// both are zero (authenticators without counters report zero permanently).
/// A counter that fails to advance means a cloned authenticator is operating
/// in parallel.
fn check_counter(record: &CredentialRecord, asserted: u32) -> Result<()> {
    let stored = record.counter;
    if stored == 0 && asserted == 0 {
        return Ok(());
    }
    if asserted <= stored {
        tracing::warn!(
            credential_id = %hex::encode(&record.credential_id),
            stored,
            asserted,
            security = "cloned_authenticator_suspected",
            "signature counter did not advance"
        );
        return Err(ValidationError::MaliciousCounterValue { stored, asserted });
    }
    Ok(())
}
