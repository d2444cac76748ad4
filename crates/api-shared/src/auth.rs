/// Errors from API key checks.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("API_KEY is not configured")]
    NotConfigured,
    #[error("invalid API key")]
    InvalidKey,
}

/// Validates the provided API key against the key resolved at startup.
///
/// Returns `Ok(())` if the key matches, or an error if it does not or no key is configured.
pub fn validate_api_key(provided_key: &str, expected_key: Option<&str>) -> Result<(), AuthError> {
    let expected_key = expected_key.ok_or(AuthError::NotConfigured)?;

    if provided_key == expected_key {
        Ok(())
    } else {
        Err(AuthError::InvalidKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_configured_key_only() {
        assert_eq!(validate_api_key("k1", Some("k1")), Ok(()));
        assert_eq!(
            validate_api_key("k2", Some("k1")),
            Err(AuthError::InvalidKey)
        );
        assert_eq!(validate_api_key("k1", None), Err(AuthError::NotConfigured));
    }
}
