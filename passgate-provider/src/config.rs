//! Provider configuration.

use std::collections::HashSet;

use passgate_core::Origin;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid origin {0}")]
    InvalidOrigin(String),
    #[error("at least one origin must be configured")]
    NoOrigins,
}

/// Authentication provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Acceptable request origins. Must be non-empty.
    pub origins: Vec<Origin>,
    /// Relying party id; derived from the first origin's host when unset.
    pub rp_id: Option<String>,
    /// Client extension identifiers the relying party expects.
    pub expected_extension_ids: HashSet<String>,
    /// Mask unknown credential ids as generic bad credentials instead of
    /// revealing which ids are registered. Disabling this is less secure.
    pub hide_credential_id_not_found: bool,
    /// Return only the username in the authenticated token instead of the
    /// full principal.
    pub force_principal_as_string: bool,
    /// Reject credentials whose stored attestation is self-signed.
    pub prohibit_self_attestation: bool,
}

impl ProviderConfig {
    /// Create a configuration for the given origins with default policy.
    pub fn new(origins: Vec<Origin>) -> Result<Self, ConfigError> {
        if origins.is_empty() {
            return Err(ConfigError::NoOrigins);
        }
        Ok(Self {
            origins,
            rp_id: None,
            expected_extension_ids: HashSet::new(),
            hide_credential_id_not_found: true,
            force_principal_as_string: false,
            prohibit_self_attestation: false,
        })
    }

    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `PASSGATE_ORIGIN` - comma-separated allowed origins
    ///   (default: "http://localhost:3000")
    /// - `PASSGATE_RP_ID` - relying party id (default: derived from origin)
    pub fn from_env() -> Result<Self, ConfigError> {
        let origins_var = std::env::var("PASSGATE_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let origins = origins_var
            .split(',')
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| Origin::parse(text).map_err(|_| ConfigError::InvalidOrigin(text.into())))
            .collect::<Result<Vec<_>, _>>()?;

        let mut config = Self::new(origins)?;
        config.rp_id = std::env::var("PASSGATE_RP_ID").ok().filter(|id| !id.is_empty());
        Ok(config)
    }

    pub fn with_rp_id(mut self, rp_id: impl Into<String>) -> Self {
        self.rp_id = Some(rp_id.into());
        self
    }

    pub fn with_expected_extension_ids(mut self, ids: HashSet<String>) -> Self {
        self.expected_extension_ids = ids;
        self
    }

    pub fn hide_credential_id_not_found(mut self, hide: bool) -> Self {
        self.hide_credential_id_not_found = hide;
        self
    }

    pub fn force_principal_as_string(mut self, force: bool) -> Self {
        self.force_principal_as_string = force;
        self
    }

    pub fn prohibit_self_attestation(mut self, prohibit: bool) -> Self {
        self.prohibit_self_attestation = prohibit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mask_unknown_credential_ids() {
        let config =
            ProviderConfig::new(vec![Origin::parse("https://example.com").unwrap()]).unwrap();
        assert!(config.hide_credential_id_not_found);
        assert!(!config.force_principal_as_string);
        assert!(config.expected_extension_ids.is_empty());
        assert!(config.rp_id.is_none());
    }

    #[test]
    fn test_empty_origins_rejected() {
        assert!(matches!(
            ProviderConfig::new(Vec::new()),
            Err(ConfigError::NoOrigins)
        ));
    }

    #[test]
    fn test_builder_setters() {
        let config = ProviderConfig::new(vec![Origin::parse("https://example.com").unwrap()])
            .unwrap()
            .with_rp_id("example.com")
            .hide_credential_id_not_found(false)
            .force_principal_as_string(true);
        assert_eq!(config.rp_id.as_deref(), Some("example.com"));
        assert!(!config.hide_credential_id_not_found);
        assert!(config.force_principal_as_string);
    }
}
