//! The authentication orchestrator.
//!
//! A linear, single-attempt state machine: resolve the credential, run
//! pre-authentication account checks, run the protocol check set, run
//! post-authentication account checks, persist the counter through the
//! credential store, emit the authenticated token. Any failure is terminal
//! for the attempt; the caller starts over with a fresh challenge.

use std::sync::Arc;

use passgate_core::{validate_assertion, AssertionRequest, CredentialRecord, ServerContext};

use crate::account::{
    AccountChecker, AuthorityMapper, IdentityAuthorityMapper, PostAuthenticationChecks,
    PreAuthenticationChecks, Principal,
};
use crate::config::ProviderConfig;
use crate::error::{AuthenticationError, Result};
use crate::store::{ChallengeStore, CredentialStore, StoreError, UserAccountStore};

/// One authentication attempt as received from the transport layer.
#[derive(Debug, Clone)]
pub struct AuthenticationRequest {
    /// Identifies the ceremony whose challenge this assertion answers.
    pub ceremony_id: String,
    /// The assertion fields presented by the client.
    pub assertion: AssertionRequest,
}

/// The principal carried by an authenticated token.
#[derive(Debug, Clone)]
pub enum TokenPrincipal {
    /// The fully resolved principal.
    Resolved(Principal),
    /// Username only (`force_principal_as_string`).
    Username(String),
}

impl TokenPrincipal {
    pub fn username(&self) -> &str {
        match self {
            Self::Resolved(principal) => &principal.username,
            Self::Username(username) => username,
        }
    }
}

/// A successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedToken {
    pub principal: TokenPrincipal,
    /// Granted authorities after mapping.
    pub authorities: Vec<String>,
    /// The counter value persisted for this credential.
    pub counter: u32,
    /// Whether the authenticator asserted user verification.
    pub user_verified: bool,
}

/// Orchestrates assertion validation against the configured stores.
pub struct AuthenticationProvider {
    credentials: Arc<dyn CredentialStore>,
    challenges: Arc<dyn ChallengeStore>,
    accounts: Arc<dyn UserAccountStore>,
    authority_mapper: Arc<dyn AuthorityMapper>,
    pre_checks: Arc<dyn AccountChecker>,
    post_checks: Arc<dyn AccountChecker>,
    config: ProviderConfig,
}

impl AuthenticationProvider {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        challenges: Arc<dyn ChallengeStore>,
        accounts: Arc<dyn UserAccountStore>,
        config: ProviderConfig,
    ) -> Self {
        Self {
            credentials,
            challenges,
            accounts,
            authority_mapper: Arc::new(IdentityAuthorityMapper),
            pre_checks: Arc::new(PreAuthenticationChecks),
            post_checks: Arc::new(PostAuthenticationChecks),
            config,
        }
    }

    pub fn with_authority_mapper(mut self, mapper: Arc<dyn AuthorityMapper>) -> Self {
        self.authority_mapper = mapper;
        self
    }

    pub fn with_pre_authentication_checks(mut self, checks: Arc<dyn AccountChecker>) -> Self {
        self.pre_checks = checks;
        self
    }

    pub fn with_post_authentication_checks(mut self, checks: Arc<dyn AccountChecker>) -> Self {
        self.post_checks = checks;
        self
    }

    /// Authenticate one assertion.
    ///
    /// `current_user` is the username the caller is already authenticated
    /// as in this session, if any. User verification is mandatory unless
    /// the assertion resolves to that same principal (a step-up
    /// re-authentication); passing it explicitly keeps the optionality
    /// decision a pure input rather than ambient state.
    pub async fn authenticate(
        &self,
        request: AuthenticationRequest,
        current_user: Option<&str>,
    ) -> Result<AuthenticatedToken> {
        if request.assertion.credential_id.is_empty() {
            tracing::debug!("authentication failed: no credentials provided");
            return Err(AuthenticationError::BadCredentials);
        }

        let record = self.resolve_credential(&request.assertion.credential_id).await?;
        let principal = self.accounts.load_principal(&record).await?;

        self.pre_checks.check(&principal)?;

        let challenge = self.challenges.take_challenge(&request.ceremony_id).await?;
        let user_verification_required = current_user != Some(principal.username.as_str());

        let context = ServerContext {
            origins: self.config.origins.clone(),
            rp_id: self.config.rp_id.clone(),
            challenge,
            user_verification_required,
            expected_extension_ids: self.config.expected_extension_ids.clone(),
            prohibit_self_attestation: self.config.prohibit_self_attestation,
        };

        let verified = match validate_assertion(&request.assertion, &record, &context) {
            Ok(verified) => verified,
            Err(err) => {
                let err = AuthenticationError::from_validation(err);
                if err.is_security_event() {
                    tracing::warn!(
                        username = %principal.username,
                        credential_id = %hex::encode(&record.credential_id),
                        security = "cloned_authenticator_suspected",
                        error = %err,
                        "authentication rejected"
                    );
                }
                return Err(err);
            }
        };

        self.post_checks.check(&principal)?;

        self.persist_counter(&record, verified.counter).await?;

        tracing::debug!(
            username = %principal.username,
            counter = verified.counter,
            user_verified = verified.user_verified,
            "authentication succeeded"
        );

        let authorities = self.authority_mapper.map(&principal.authorities);
        let principal = if self.config.force_principal_as_string {
            TokenPrincipal::Username(principal.username)
        } else {
            TokenPrincipal::Resolved(principal)
        };

        Ok(AuthenticatedToken {
            principal,
            authorities,
            counter: verified.counter,
            user_verified: verified.user_verified,
        })
    }

    /// Look up the stored record for a presented credential id.
    ///
    /// By default an unknown id is masked as generic bad credentials so the
    /// failure mode does not reveal which credential ids are registered.
    async fn resolve_credential(&self, credential_id: &[u8]) -> Result<CredentialRecord> {
        match self.credentials.find_by_credential_id(credential_id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => {
                tracing::debug!(
                    credential_id = %hex::encode(credential_id),
                    "authentication failed: credential id not registered"
                );
                if self.config.hide_credential_id_not_found {
                    Err(AuthenticationError::BadCredentials)
                } else {
                    Err(AuthenticationError::CredentialIdNotFound)
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "credential store lookup failed");
                Err(err.into())
            }
        }
    }

    /// Report the advanced counter to the credential store.
    ///
    /// When both counters are zero the authenticator does not implement
    /// counters and there is nothing to persist. A lost compare-and-set
    /// race means a concurrent attempt on the same credential already won;
    /// this attempt fails as a service fault and can be retried with a
    /// fresh ceremony.
    async fn persist_counter(&self, record: &CredentialRecord, new_counter: u32) -> Result<()> {
        if new_counter == record.counter {
            return Ok(());
        }
        match self.credentials.update_counter(&record.credential_id, new_counter).await {
            Ok(()) => Ok(()),
            Err(StoreError::Conflict) => {
                tracing::warn!(
                    credential_id = %hex::encode(&record.credential_id),
                    new_counter,
                    "counter write-back lost a concurrent update"
                );
                Err(AuthenticationError::ServiceError(
                    "concurrent authentication advanced the signature counter".into(),
                ))
            }
            Err(err) => {
                tracing::error!(error = %err, "counter write-back failed");
                Err(err.into())
            }
        }
    }
}
