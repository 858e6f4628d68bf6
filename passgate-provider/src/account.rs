//! Principals and account-state policy.
//!
//! Account checks are split into a pre-authentication pass (locked,
//! disabled, expired) that runs before the protocol checks and a
//! post-authentication pass (credentials expired) that runs only after the
//! client has proven possession of the private key, so account state cannot
//! be probed without a valid assertion.

use chrono::{DateTime, Utc};

use crate::error::{AuthenticationError, Result};

/// A resolved identity with its granted authorities and account state.
#[derive(Debug, Clone)]
pub struct Principal {
    pub username: String,
    /// Raw authority names as stored; mapped through an [`AuthorityMapper`]
    /// before they reach the caller.
    pub authorities: Vec<String>,
    pub locked: bool,
    pub enabled: bool,
    /// Account expiry instant, when the account is time-limited.
    pub account_expires_at: Option<DateTime<Utc>>,
    /// Credential expiry instant, when credentials are time-limited.
    pub credentials_expire_at: Option<DateTime<Utc>>,
}

impl Principal {
    /// An enabled, unlocked, non-expiring principal.
    pub fn active(username: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            username: username.into(),
            authorities,
            locked: false,
            enabled: true,
            account_expires_at: None,
            credentials_expire_at: None,
        }
    }

    pub fn account_expired(&self, now: DateTime<Utc>) -> bool {
        self.account_expires_at.is_some_and(|expires| expires <= now)
    }

    pub fn credentials_expired(&self, now: DateTime<Utc>) -> bool {
        self.credentials_expire_at.is_some_and(|expires| expires <= now)
    }
}

/// A swappable account-state check pass.
pub trait AccountChecker: Send + Sync {
    fn check(&self, principal: &Principal) -> Result<()>;
}

/// Pre-authentication checks: locked, disabled, expired.
#[derive(Debug, Default)]
pub struct PreAuthenticationChecks;

impl AccountChecker for PreAuthenticationChecks {
    fn check(&self, principal: &Principal) -> Result<()> {
        if principal.locked {
            tracing::debug!(username = %principal.username, "user account is locked");
            return Err(AuthenticationError::AccountLocked);
        }
        if !principal.enabled {
            tracing::debug!(username = %principal.username, "user account is disabled");
            return Err(AuthenticationError::AccountDisabled);
        }
        if principal.account_expired(Utc::now()) {
            tracing::debug!(username = %principal.username, "user account is expired");
            return Err(AuthenticationError::AccountExpired);
        }
        Ok(())
    }
}

/// Post-authentication checks: credentials expired.
#[derive(Debug, Default)]
pub struct PostAuthenticationChecks;

impl AccountChecker for PostAuthenticationChecks {
    fn check(&self, principal: &Principal) -> Result<()> {
        if principal.credentials_expired(Utc::now()) {
            tracing::debug!(username = %principal.username, "user account credentials have expired");
            return Err(AuthenticationError::CredentialsExpired);
        }
        Ok(())
    }
}

/// Maps stored authority names to the granted set.
pub trait AuthorityMapper: Send + Sync {
    fn map(&self, authorities: &[String]) -> Vec<String>;
}

/// The default mapper: authorities pass through unchanged.
#[derive(Debug, Default)]
pub struct IdentityAuthorityMapper;

impl AuthorityMapper for IdentityAuthorityMapper {
    fn map(&self, authorities: &[String]) -> Vec<String> {
        authorities.to_vec()
    }
}
