//! Challenge validation.
//!
//! The single most security-critical equality in the pipeline: the
//! challenge echoed inside the client data must be byte-for-byte the one
//! the server issued for this ceremony. Comparing any decoded or truncated
//! form would accept re-encoded challenges, so the comparison is over the
//! full byte sequence, in constant time.

use aws_lc_rs::constant_time;

use crate::challenge::Challenge;
use crate::client_data::CollectedClientData;
use crate::error::{Result, ValidationError};
use crate::types::ServerContext;

/// Compare an issued challenge against the one echoed by the client.
pub fn validate_pair(expected: &Challenge, actual: &Challenge) -> Result<()> {
    if constant_time::verify_slices_are_equal(expected.as_bytes(), actual.as_bytes()).is_err() {
        tracing::debug!("authentication failed: bad challenge");
        return Err(ValidationError::BadChallenge);
    }
    Ok(())
}

/// Validate the challenge member of the client data against the server
/// context.
///
/// An absent stored challenge is a server-originated condition (expired or
/// never issued), reported as `MissingChallenge` and never attributed to
/// the client.
pub fn validate(client_data: &CollectedClientData, context: &ServerContext) -> Result<()> {
    let Some(stored) = context.challenge.as_ref() else {
        tracing::debug!("authentication failed: no challenge stored for this ceremony");
        return Err(ValidationError::MissingChallenge);
    };
    validate_pair(stored, &client_data.challenge)
}
