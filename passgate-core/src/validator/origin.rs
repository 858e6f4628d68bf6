//! Origin validation.

use crate::error::{Result, ValidationError};
use crate::types::Origin;

/// The asserted origin must be a member of the configured acceptable
/// origin set. An unparseable origin string is attacker-controlled input
/// and fails the same way a wrong one does.
pub fn validate(asserted: &str, allowed: &[Origin]) -> Result<()> {
    let origin = match Origin::parse(asserted) {
        Ok(origin) => origin,
        Err(_) => {
            tracing::debug!(origin = asserted, "authentication failed: unparseable origin");
            return Err(ValidationError::BadOrigin(asserted.to_string()));
        }
    };
    if !allowed.contains(&origin) {
        tracing::debug!(origin = asserted, "authentication failed: origin not allowed");
        return Err(ValidationError::BadOrigin(asserted.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<Origin> {
        vec![
            Origin::parse("https://example.com").unwrap(),
            Origin::parse("https://app.example.com:8443").unwrap(),
        ]
    }

    #[test]
    fn test_member_origin_passes() {
        validate("https://example.com", &allowed()).unwrap();
        validate("https://example.com:443", &allowed()).unwrap();
        validate("https://app.example.com:8443", &allowed()).unwrap();
    }

    #[test]
    fn test_non_member_origin_fails() {
        let err = validate("https://evil.example.net", &allowed()).unwrap_err();
        assert!(matches!(err, ValidationError::BadOrigin(o) if o == "https://evil.example.net"));
    }

    #[test]
    fn test_scheme_downgrade_fails() {
        let err = validate("http://example.com", &allowed()).unwrap_err();
        assert!(matches!(err, ValidationError::BadOrigin(_)));
    }

    #[test]
    fn test_garbage_origin_fails_as_bad_origin() {
        let err = validate("not an origin", &allowed()).unwrap_err();
        assert!(matches!(err, ValidationError::BadOrigin(_)));
    }
}
