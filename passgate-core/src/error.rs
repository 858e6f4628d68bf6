use thiserror::Error;

/// A violation of one protocol property of the authentication ceremony.
///
/// The set is closed and flat so callers can match on the exact property
/// that failed: a replayed counter is operationally different from a stale
/// challenge or a wrong origin, and audit logging depends on keeping them
/// apart.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("no challenge is stored for this ceremony")]
    MissingChallenge,

    #[error("asserted challenge does not match the issued challenge")]
    BadChallenge,

    #[error("asserted origin {0} is not in the allowed origin set")]
    BadOrigin(String),

    #[error("rpIdHash does not match relying party id {expected}")]
    BadRpId { expected: String },

    #[error("client data declares ceremony type {0}, expected webauthn.get")]
    MaliciousData(String),

    #[error("user presence flag is not set")]
    UserNotPresent,

    #[error("user verification flag is not set but verification is required")]
    UserNotVerified,

    #[error("unexpected client extension identifier {0}")]
    ConstraintViolation(String),

    #[error("signature algorithm {asserted} does not match registered algorithm {registered}")]
    BadAlgorithm { registered: i64, asserted: i64 },

    #[error("assertion signature verification failed")]
    BadSignature,

    #[error("signature counter did not advance (stored {stored}, asserted {asserted})")]
    MaliciousCounterValue { stored: u32, asserted: u32 },

    #[error("malformed attestation statement: {0}")]
    BadAttestationStatement(String),

    #[error("unsupported attestation statement format {0}")]
    UnsupportedAttestationFormat(String),

    #[error("attestation certificate error: {0}")]
    CertificateError(String),

    #[error("self attestation is asserted while prohibited by policy")]
    SelfAttestationProhibited,

    #[error("malformed payload: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
