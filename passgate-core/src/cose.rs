//! COSE public keys and signature verification.
//!
//! Registered credentials carry their public key as a COSE_Key CBOR map.
//! Verification dispatches on the COSE algorithm recorded at registration:
//! ES256 (-7), EdDSA (-8) and RS256 (-257), the algorithms in common use by
//! platform and roaming authenticators.

use aws_lc_rs::signature::{
    RsaPublicKeyComponents, UnparsedPublicKey, ECDSA_P256_SHA256_ASN1, ED25519,
    RSA_PKCS1_2048_8192_SHA256,
};
use ciborium::value::Value;

use crate::error::{Result, ValidationError};

// COSE_Key map labels.
const LABEL_KTY: i64 = 1;
const LABEL_ALG: i64 = 3;
const LABEL_CRV_OR_N: i64 = -1;
const LABEL_X_OR_E: i64 = -2;
const LABEL_Y: i64 = -3;

// COSE key types.
const KTY_OKP: i64 = 1;
const KTY_EC2: i64 = 2;
const KTY_RSA: i64 = 3;

/// COSE signature algorithms accepted for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoseAlgorithm {
    /// ECDSA over P-256 with SHA-256 (COSE -7).
    Es256,
    /// Ed25519 (COSE -8).
    Eddsa,
    /// RSASSA-PKCS1-v1_5 with SHA-256 (COSE -257).
    Rs256,
}

impl CoseAlgorithm {
    /// Map a COSE algorithm identifier to a supported algorithm.
    pub fn from_cose_id(id: i64) -> Option<Self> {
        match id {
            -7 => Some(Self::Es256),
            -8 => Some(Self::Eddsa),
            -257 => Some(Self::Rs256),
            _ => None,
        }
    }

    /// The COSE identifier of this algorithm.
    pub fn cose_id(&self) -> i64 {
        match self {
            Self::Es256 => -7,
            Self::Eddsa => -8,
            Self::Rs256 => -257,
        }
    }

    fn expected_kty(&self) -> i64 {
        match self {
            Self::Es256 => KTY_EC2,
            Self::Eddsa => KTY_OKP,
            Self::Rs256 => KTY_RSA,
        }
    }
}

impl std::fmt::Display for CoseAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Es256 => write!(f, "ES256"),
            Self::Eddsa => write!(f, "EdDSA"),
            Self::Rs256 => write!(f, "RS256"),
        }
    }
}

/// A stored credential public key: opaque COSE_Key bytes tagged with the
/// algorithm recorded at registration.
#[derive(Debug, Clone)]
pub struct CosePublicKey {
    cose_key: Vec<u8>,
    algorithm: CoseAlgorithm,
}

impl CosePublicKey {
    pub fn new(cose_key: impl Into<Vec<u8>>, algorithm: CoseAlgorithm) -> Self {
        Self {
            cose_key: cose_key.into(),
            algorithm,
        }
    }

    pub fn algorithm(&self) -> CoseAlgorithm {
        self.algorithm
    }

    pub fn as_cose_bytes(&self) -> &[u8] {
        &self.cose_key
    }

    /// Verify `signature` over `signed_data` with this key.
    ///
    /// An algorithm tag inside the COSE_Key that disagrees with the
    /// registered algorithm is a `BadAlgorithm` violation; a key whose CBOR
    /// structure cannot be read is a decode fault (the stored record is
    /// server-side data); a cryptographic mismatch is `BadSignature`.
    pub fn verify(&self, signed_data: &[u8], signature: &[u8]) -> Result<()> {
        let map = self.parse_map()?;

        if let Some(alg) = find_integer(&map, LABEL_ALG) {
            if alg != self.algorithm.cose_id() {
                return Err(ValidationError::BadAlgorithm {
                    registered: self.algorithm.cose_id(),
                    asserted: alg,
                });
            }
        }
        let kty = find_integer(&map, LABEL_KTY)
            .ok_or_else(|| ValidationError::Decode("COSE key has no kty member".into()))?;
        if kty != self.algorithm.expected_kty() {
            return Err(ValidationError::Decode(format!(
                "COSE key type {kty} cannot carry a {} key",
                self.algorithm
            )));
        }

        match self.algorithm {
            CoseAlgorithm::Es256 => verify_es256(&map, signed_data, signature),
            CoseAlgorithm::Eddsa => verify_eddsa(&map, signed_data, signature),
            CoseAlgorithm::Rs256 => verify_rs256(&map, signed_data, signature),
        }
    }

    fn parse_map(&self) -> Result<Vec<(Value, Value)>> {
        let value: Value = ciborium::from_reader(self.cose_key.as_slice())
            .map_err(|e| ValidationError::Decode(format!("COSE key is not valid CBOR: {e}")))?;
        match value {
            Value::Map(map) => Ok(map),
            _ => Err(ValidationError::Decode("COSE key is not a CBOR map".into())),
        }
    }
}

fn find_value<'a>(map: &'a [(Value, Value)], label: i64) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.as_integer() == Some(label.into()))
        .map(|(_, v)| v)
}

fn find_integer(map: &[(Value, Value)], label: i64) -> Option<i64> {
    find_value(map, label)
        .and_then(Value::as_integer)
        .and_then(|i| i128::from(i).try_into().ok())
}

fn find_bytes<'a>(map: &'a [(Value, Value)], label: i64) -> Result<&'a [u8]> {
    find_value(map, label)
        .and_then(Value::as_bytes)
        .map(Vec::as_slice)
        .ok_or_else(|| ValidationError::Decode(format!("COSE key member {label} is missing")))
}

fn verify_es256(map: &[(Value, Value)], signed_data: &[u8], signature: &[u8]) -> Result<()> {
    let x = find_bytes(map, LABEL_X_OR_E)?;
    let y = find_bytes(map, LABEL_Y)?;

    // Uncompressed SEC1 point: 0x04 || x || y.
    let mut point = Vec::with_capacity(1 + x.len() + y.len());
    point.push(0x04);
    point.extend_from_slice(x);
    point.extend_from_slice(y);

    UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, &point)
        .verify(signed_data, signature)
        .map_err(|_| ValidationError::BadSignature)
}

fn verify_eddsa(map: &[(Value, Value)], signed_data: &[u8], signature: &[u8]) -> Result<()> {
    let x = find_bytes(map, LABEL_X_OR_E)?;
    if x.len() != 32 {
        return Err(ValidationError::Decode(format!(
            "Ed25519 public key is {} bytes, expected 32",
            x.len()
        )));
    }
    UnparsedPublicKey::new(&ED25519, x)
        .verify(signed_data, signature)
        .map_err(|_| ValidationError::BadSignature)
}

fn verify_rs256(map: &[(Value, Value)], signed_data: &[u8], signature: &[u8]) -> Result<()> {
    let n = find_bytes(map, LABEL_CRV_OR_N)?;
    let e = find_bytes(map, LABEL_X_OR_E)?;
    RsaPublicKeyComponents { n, e }
        .verify(&RSA_PKCS1_2048_8192_SHA256, signed_data, signature)
        .map_err(|_| ValidationError::BadSignature)
}
