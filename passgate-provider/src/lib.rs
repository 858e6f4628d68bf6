//! Passgate Provider - WebAuthn authentication orchestration
//!
//! This crate wraps the pure validation pipeline of `passgate-core` in the
//! full authentication flow a relying party runs: credential resolution with
//! enumeration-resistant masking, pre/post account-state policy, challenge
//! consumption, user-verification escalation, counter persistence and
//! authority mapping.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use passgate_core::Origin;
//! use passgate_provider::{
//!     AuthenticationProvider, AuthenticationRequest, ProviderConfig,
//!     MemoryChallengeStore, MemoryCredentialStore, MemoryUserAccountStore,
//! };
//!
//! # async fn example(request: AuthenticationRequest)
//! # -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Arc::new(MemoryCredentialStore::new());
//! let challenges = Arc::new(MemoryChallengeStore::new());
//! let accounts = Arc::new(MemoryUserAccountStore::new());
//!
//! let config = ProviderConfig::new(vec![Origin::parse("https://example.com")?])?;
//! let provider = AuthenticationProvider::new(credentials, challenges.clone(), accounts, config);
//!
//! // Issue a challenge, let the client sign it, then:
//! let token = provider.authenticate(request, None).await?;
//! println!("authenticated {}", token.principal.username());
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod config;
pub mod error;
pub mod provider;
pub mod store;

// Re-export main types for convenience
pub use account::{
    AccountChecker, AuthorityMapper, IdentityAuthorityMapper, PostAuthenticationChecks,
    PreAuthenticationChecks, Principal,
};
pub use config::{ConfigError, ProviderConfig};
pub use error::{AuthenticationError, Result};
pub use provider::{
    AuthenticatedToken, AuthenticationProvider, AuthenticationRequest, TokenPrincipal,
};
pub use store::{
    ChallengeStore, CredentialStore, MemoryChallengeStore, MemoryCredentialStore,
    MemoryUserAccountStore, StoreError, UserAccountStore,
};
