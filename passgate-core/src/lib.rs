//! Passgate Core - WebAuthn assertion validation pipeline
//!
//! This crate implements the relying-party side of the WebAuthn
//! authentication ceremony: given a stored credential record and a freshly
//! received assertion, it runs an ordered set of independent protocol checks
//! and either returns a verified result or a typed error naming exactly
//! which protocol property was violated.
//!
//! # Checks, in order
//!
//! 1. Challenge equality (full byte sequence, constant time)
//! 2. Origin membership (exact scheme+host+port)
//! 3. rpIdHash against the relying party id
//! 4. Ceremony type (`webauthn.get`)
//! 5. User-present flag
//! 6. User-verified flag, when required for this attempt
//! 7. Client extension identifiers against the expected set
//! 8. Signature over `authenticator_data || SHA-256(client_data)`
//! 9. Signature counter strictly advancing (cloning detection)
//!
//! Validation is a pure function of its three inputs; orchestration,
//! credential resolution and account policy live in `passgate-provider`.
//!
//! # Example
//!
//! ```no_run
//! use passgate_core::{validate_assertion, AssertionRequest, CredentialRecord, ServerContext};
//! use passgate_core::{Challenge, Origin};
//! use std::collections::HashSet;
//!
//! # fn example(request: AssertionRequest, record: CredentialRecord, issued: Challenge)
//! # -> passgate_core::Result<()> {
//! let context = ServerContext {
//!     origins: vec![Origin::parse("https://example.com")?],
//!     rp_id: None,
//!     challenge: Some(issued),
//!     user_verification_required: true,
//!     expected_extension_ids: HashSet::new(),
//!     prohibit_self_attestation: false,
//! };
//! let verified = validate_assertion(&request, &record, &context)?;
//! // Persist verified.counter through the credential store.
//! # Ok(())
//! # }
//! ```

pub mod attestation;
pub mod authenticator_data;
pub mod challenge;
pub mod client_data;
pub mod cose;
pub mod error;
pub mod types;
pub mod validator;

// Re-export main types for convenience
pub use attestation::{check_attestation, AttestationFormat, AttestationMetadata};
pub use authenticator_data::{
    AuthenticatorData, AUTHENTICATOR_DATA_MIN_LEN, FLAG_AT, FLAG_ED, FLAG_UP, FLAG_UV,
};
pub use challenge::{Challenge, CHALLENGE_LEN};
pub use client_data::{CeremonyType, CollectedClientData};
pub use cose::{CoseAlgorithm, CosePublicKey};
pub use error::{Result, ValidationError};
pub use types::{AssertionRequest, CredentialRecord, Origin, ServerContext, VerifiedAssertion};
pub use validator::validate_assertion;
