//! Authenticator data.
//!
//! The authenticator-data payload opens with a fixed 37-byte header:
//! rpIdHash (32 bytes), one flags byte, and a big-endian u32 signature
//! counter. Assertions may append extension data after the header (ED flag);
//! attested credential data (AT flag) only appears during registration.

use crate::error::{Result, ValidationError};

/// Minimum authenticator-data length: rpIdHash + flags + signCount.
pub const AUTHENTICATOR_DATA_MIN_LEN: usize = 37;

/// User present.
pub const FLAG_UP: u8 = 0x01;
/// User verified.
pub const FLAG_UV: u8 = 0x04;
/// Attested credential data included.
pub const FLAG_AT: u8 = 0x40;
/// Extension data included.
pub const FLAG_ED: u8 = 0x80;

/// Parsed authenticator-data header for one assertion.
#[derive(Debug, Clone)]
pub struct AuthenticatorData {
    /// SHA-256 hash of the relying party id the authenticator scoped the
    /// credential to.
    pub rp_id_hash: [u8; 32],
    /// Raw flags byte.
    pub flags: u8,
    /// Signature counter reported by the authenticator.
    pub sign_count: u32,
}

impl AuthenticatorData {
    /// Parse the header of a raw authenticator-data payload.
    ///
    /// Trailing bytes (extension data) are tolerated; the signature covers
    /// the raw payload, so nothing after the header needs re-encoding here.
    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        if payload.len() < AUTHENTICATOR_DATA_MIN_LEN {
            return Err(ValidationError::Decode(format!(
                "authenticator data is {} bytes, expected at least {AUTHENTICATOR_DATA_MIN_LEN}",
                payload.len()
            )));
        }
        let mut rp_id_hash = [0u8; 32];
        rp_id_hash.copy_from_slice(&payload[..32]);
        let flags = payload[32];
        let sign_count = u32::from_be_bytes([payload[33], payload[34], payload[35], payload[36]]);
        Ok(Self {
            rp_id_hash,
            flags,
            sign_count,
        })
    }

    pub fn user_present(&self) -> bool {
        self.flags & FLAG_UP != 0
    }

    pub fn user_verified(&self) -> bool {
        self.flags & FLAG_UV != 0
    }

    pub fn attested_credential_data_included(&self) -> bool {
        self.flags & FLAG_AT != 0
    }

    pub fn extension_data_included(&self) -> bool {
        self.flags & FLAG_ED != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_data(flags: u8, sign_count: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&[0xAB; 32]);
        data.push(flags);
        data.extend_from_slice(&sign_count.to_be_bytes());
        data
    }

    #[test]
    fn test_header_layout() {
        let parsed = AuthenticatorData::from_bytes(&auth_data(FLAG_UP, 42)).unwrap();
        assert_eq!(parsed.rp_id_hash, [0xAB; 32]);
        assert_eq!(parsed.sign_count, 42, "signCount must be big-endian");
        assert!(parsed.user_present());
        assert!(!parsed.user_verified());
    }

    #[test]
    fn test_flag_accessors() {
        let parsed =
            AuthenticatorData::from_bytes(&auth_data(FLAG_UP | FLAG_UV | FLAG_ED, 7)).unwrap();
        assert!(parsed.user_present());
        assert!(parsed.user_verified());
        assert!(parsed.extension_data_included());
        assert!(!parsed.attested_credential_data_included());
    }

    #[test]
    fn test_trailing_extension_bytes_tolerated() {
        let mut data = auth_data(FLAG_UP | FLAG_ED, 3);
        data.extend_from_slice(&[0xA0]); // empty CBOR map
        let parsed = AuthenticatorData::from_bytes(&data).unwrap();
        assert_eq!(parsed.sign_count, 3);
    }

    #[test]
    fn test_short_payload_is_decode_error() {
        let err = AuthenticatorData::from_bytes(&[0u8; 36]).unwrap_err();
        assert!(matches!(err, ValidationError::Decode(_)));
    }
}
