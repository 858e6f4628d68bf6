//! Relying-party id validation.

use aws_lc_rs::constant_time;
use aws_lc_rs::digest::{self, SHA256};

use crate::authenticator_data::AuthenticatorData;
use crate::error::{Result, ValidationError};

/// The rpIdHash embedded in the authenticator data must equal the SHA-256
/// hash of the relying party id this ceremony was scoped to.
pub fn validate(authenticator_data: &AuthenticatorData, rp_id: &str) -> Result<()> {
    let expected = digest::digest(&SHA256, rp_id.as_bytes());
    if constant_time::verify_slices_are_equal(expected.as_ref(), &authenticator_data.rp_id_hash)
        .is_err()
    {
        tracing::debug!(rp_id, "authentication failed: rpIdHash mismatch");
        return Err(ValidationError::BadRpId {
            expected: rp_id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_data_for(rp_id: &str) -> AuthenticatorData {
        let hash = digest::digest(&SHA256, rp_id.as_bytes());
        let mut rp_id_hash = [0u8; 32];
        rp_id_hash.copy_from_slice(hash.as_ref());
        AuthenticatorData {
            rp_id_hash,
            flags: 0x01,
            sign_count: 0,
        }
    }

    #[test]
    fn test_matching_rp_id_passes() {
        validate(&auth_data_for("example.com"), "example.com").unwrap();
    }

    #[test]
    fn test_different_rp_id_fails() {
        let err = validate(&auth_data_for("example.com"), "other.example.net").unwrap_err();
        assert!(matches!(err, ValidationError::BadRpId { expected } if expected == "other.example.net"));
    }
}
