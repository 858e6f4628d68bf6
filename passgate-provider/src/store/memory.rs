//! In-memory store implementations.
//!
//! Challenges are temporary and never need persistence; credentials and
//! accounts held here are for tests and development, where losing them on
//! restart is acceptable.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use passgate_core::{Challenge, CredentialRecord};

use super::{ChallengeStore, CredentialStore, StoreError, UserAccountStore};
use crate::account::Principal;

/// Maximum age for issued challenges (5 minutes).
const CHALLENGE_EXPIRY_SECS: u64 = 300;

struct ChallengeEntry {
    challenge: Challenge,
    expires_at: Instant,
}

/// In-memory challenge store with expiry and single-use take semantics.
pub struct MemoryChallengeStore {
    entries: DashMap<String, ChallengeEntry>,
    ttl: Duration,
}

impl Default for MemoryChallengeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChallengeStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(CHALLENGE_EXPIRY_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Issue a fresh challenge for a new ceremony, returning the ceremony id
    /// to hand to the client alongside the challenge.
    pub fn issue(&self) -> (String, Challenge) {
        let ceremony_id = uuid::Uuid::new_v4().to_string();
        let challenge = Challenge::random();
        self.put(ceremony_id.clone(), challenge.clone());
        (ceremony_id, challenge)
    }

    /// Store a challenge under a caller-chosen ceremony id.
    pub fn put(&self, ceremony_id: String, challenge: Challenge) {
        self.entries.insert(
            ceremony_id,
            ChallengeEntry {
                challenge,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Remove expired challenges (called periodically).
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl ChallengeStore for MemoryChallengeStore {
    async fn take_challenge(&self, ceremony_id: &str) -> Result<Option<Challenge>, StoreError> {
        let Some((_, entry)) = self.entries.remove(ceremony_id) else {
            return Ok(None);
        };
        if entry.expires_at > Instant::now() {
            Ok(Some(entry.challenge))
        } else {
            Ok(None) // Expired
        }
    }
}

/// In-memory credential store with compare-and-set counter updates.
#[derive(Default)]
pub struct MemoryCredentialStore {
    records: DashMap<Vec<u8>, CredentialRecord>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: CredentialRecord) {
        self.records.insert(record.credential_id.clone(), record);
    }

    pub fn credential_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_credential_id(
        &self,
        credential_id: &[u8],
    ) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.records.get(credential_id).map(|entry| entry.value().clone()))
    }

    async fn update_counter(
        &self,
        credential_id: &[u8],
        new_counter: u32,
    ) -> Result<(), StoreError> {
        let Some(mut entry) = self.records.get_mut(credential_id) else {
            return Err(StoreError::Query("unknown credential id".into()));
        };
        // The dashmap shard lock makes this compare-and-set atomic.
        if entry.counter >= new_counter {
            return Err(StoreError::Conflict);
        }
        entry.counter = new_counter;
        Ok(())
    }
}

/// In-memory account store, keyed by owning credential id.
#[derive(Default)]
pub struct MemoryUserAccountStore {
    principals: DashMap<Vec<u8>, Principal>,
}

impl MemoryUserAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, credential_id: Vec<u8>, principal: Principal) {
        self.principals.insert(credential_id, principal);
    }
}

#[async_trait]
impl UserAccountStore for MemoryUserAccountStore {
    async fn load_principal(&self, record: &CredentialRecord) -> Result<Principal, StoreError> {
        self.principals
            .get(&record.credential_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::Query("no account owns this credential".into()))
    }
}
