use passgate_core::ValidationError;
use thiserror::Error;

use crate::store::StoreError;

/// Every way an authentication attempt can fail, as one closed set.
///
/// Three categories share the enum without a hierarchy so callers can match
/// on the exact kind: protocol violations (client- or attacker-attributable,
/// definitive), account-policy violations (definitive for the attempt,
/// resolved by account administration), and `ServiceError` (infrastructure,
/// the only retryable kind).
#[derive(Error, Debug)]
pub enum AuthenticationError {
    // --- credential resolution ---
    #[error("bad credentials")]
    BadCredentials,

    #[error("credential id is not registered")]
    CredentialIdNotFound,

    // --- account policy ---
    #[error("user account is locked")]
    AccountLocked,

    #[error("user account is disabled")]
    AccountDisabled,

    #[error("user account has expired")]
    AccountExpired,

    #[error("user credentials have expired")]
    CredentialsExpired,

    // --- protocol violations (one per passgate-core kind) ---
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

    // --- infrastructure ---
    #[error("service error: {0}")]
    ServiceError(String),
}

impl AuthenticationError {
    /// Translate a protocol-validation failure one-to-one.
    ///
    /// Decode faults are the exception: malformed binary input is an
    /// infrastructure-shaped condition, not a distinct protocol violation,
    /// and surfaces as `ServiceError`.
    pub fn from_validation(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingChallenge => Self::MissingChallenge,
            ValidationError::BadChallenge => Self::BadChallenge,
            ValidationError::BadOrigin(origin) => Self::BadOrigin(origin),
            ValidationError::BadRpId { expected } => Self::BadRpId { expected },
            ValidationError::MaliciousData(declared) => Self::MaliciousData(declared),
            ValidationError::UserNotPresent => Self::UserNotPresent,
            ValidationError::UserNotVerified => Self::UserNotVerified,
            ValidationError::ConstraintViolation(id) => Self::ConstraintViolation(id),
            ValidationError::BadAlgorithm { registered, asserted } => {
                Self::BadAlgorithm { registered, asserted }
            }
            ValidationError::BadSignature => Self::BadSignature,
            ValidationError::MaliciousCounterValue { stored, asserted } => {
                Self::MaliciousCounterValue { stored, asserted }
            }
            ValidationError::BadAttestationStatement(detail) => {
                Self::BadAttestationStatement(detail)
            }
            ValidationError::UnsupportedAttestationFormat(format) => {
                Self::UnsupportedAttestationFormat(format)
            }
            ValidationError::CertificateError(detail) => Self::CertificateError(detail),
            ValidationError::SelfAttestationProhibited => Self::SelfAttestationProhibited,
            ValidationError::Decode(detail) => Self::ServiceError(detail),
        }
    }

    /// Only infrastructure faults are worth retrying; every other kind is a
    /// definitive rejection of this attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServiceError(_))
    }

    /// Whether this failure implies compromise rather than user error and
    /// belongs in security audit logs.
    pub fn is_security_event(&self) -> bool {
        matches!(self, Self::MaliciousCounterValue { .. })
    }
}

impl From<StoreError> for AuthenticationError {
    fn from(err: StoreError) -> Self {
        Self::ServiceError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AuthenticationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_service_error_is_retryable() {
        assert!(AuthenticationError::ServiceError("store down".into()).is_retryable());
        assert!(!AuthenticationError::BadChallenge.is_retryable());
        assert!(!AuthenticationError::AccountLocked.is_retryable());
        assert!(!AuthenticationError::MaliciousCounterValue { stored: 5, asserted: 5 }
            .is_retryable());
    }

    #[test]
    fn test_validation_kinds_map_one_to_one() {
        let err = AuthenticationError::from_validation(ValidationError::BadOrigin(
            "https://evil.example.net".into(),
        ));
        assert!(matches!(err, AuthenticationError::BadOrigin(_)));

        let err = AuthenticationError::from_validation(ValidationError::MaliciousCounterValue {
            stored: 9,
            asserted: 3,
        });
        assert!(matches!(
            err,
            AuthenticationError::MaliciousCounterValue { stored: 9, asserted: 3 }
        ));
        assert!(err.is_security_event());
    }

    #[test]
    fn test_decode_faults_become_service_error() {
        let err = AuthenticationError::from_validation(ValidationError::Decode("bad cbor".into()));
        assert!(matches!(err, AuthenticationError::ServiceError(_)));
        assert!(err.is_retryable());
    }
}
