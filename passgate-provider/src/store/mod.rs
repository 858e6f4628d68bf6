//! Store contracts for the external collaborators of the orchestrator.
//!
//! The orchestrator never persists anything itself: credentials, challenges
//! and user accounts live behind these traits. The in-memory implementations
//! in [`memory`] back the tests and small deployments; persistent backends
//! implement the same contracts.

mod memory;

pub use memory::{MemoryChallengeStore, MemoryCredentialStore, MemoryUserAccountStore};

use async_trait::async_trait;
use passgate_core::{Challenge, CredentialRecord};

use crate::account::Principal;

/// Store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query error: {0}")]
    Query(String),

    /// A counter write-back lost a compare-and-set race with a concurrent
    /// authentication against the same credential.
    #[error("counter update conflict")]
    Conflict,
}

/// Registered credentials, keyed by credential id.
///
/// `update_counter` must be serialized per credential (compare-and-set or
/// equivalent): two concurrent authentications must never both observe the
/// same old counter and both persist, or cloning detection is defeated.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_credential_id(
        &self,
        credential_id: &[u8],
    ) -> Result<Option<CredentialRecord>, StoreError>;

    async fn update_counter(
        &self,
        credential_id: &[u8],
        new_counter: u32,
    ) -> Result<(), StoreError>;
}

/// Issued ceremony challenges. `take_challenge` is single-use: a challenge
/// can never satisfy two ceremonies.
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    async fn take_challenge(&self, ceremony_id: &str) -> Result<Option<Challenge>, StoreError>;
}

/// Resolves the account that owns a credential.
#[async_trait]
pub trait UserAccountStore: Send + Sync {
    async fn load_principal(&self, record: &CredentialRecord) -> Result<Principal, StoreError>;
}
