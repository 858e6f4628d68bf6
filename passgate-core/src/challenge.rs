//! Ceremony challenges.
//!
//! A challenge is a server-issued random value bound to one ceremony. It is
//! the anti-replay anchor of the protocol: the authenticator signs over a
//! hash of the client data, which embeds the challenge, so a stale or
//! attacker-chosen challenge cannot produce an acceptable assertion.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, ValidationError};

/// Byte length of generated challenges.
pub const CHALLENGE_LEN: usize = 32;

/// A server-issued ceremony challenge.
///
/// Held zeroized-on-drop: until it is consumed by a validation, the stored
/// challenge is the one secret the replay protection rests on.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Challenge(Vec<u8>);

impl Challenge {
    /// Wrap raw challenge bytes.
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self(value.into())
    }

    /// Generate a fresh random challenge from the system CSPRNG.
    pub fn random() -> Self {
        use aws_lc_rs::rand::{SecureRandom, SystemRandom};
        let rng = SystemRandom::new();
        let mut value = vec![0u8; CHALLENGE_LEN];
        rng.fill(&mut value)
            .expect("system CSPRNG failed to produce challenge bytes");
        Self(value)
    }

    /// Decode a challenge from its base64url (unpadded) text form, the
    /// encoding the client echoes it back in.
    pub fn from_base64url(text: &str) -> Result<Self> {
        let value = URL_SAFE_NO_PAD
            .decode(text)
            .map_err(|e| ValidationError::Decode(format!("challenge is not base64url: {e}")))?;
        Ok(Self(value))
    }

    /// Render the challenge as unpadded base64url for embedding in request
    /// options.
    pub fn to_base64url(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Challenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Challenge").field(&self.to_base64url()).finish()
    }
}
