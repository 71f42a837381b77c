//! Authentication configuration (HS256 bearer tokens)

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::auth::JwtConfig;

/// Shortest shared secret accepted outside development.
pub const MIN_SECRET_BYTES: usize = 32;

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret the token issuer signs with
    pub jwt_secret: Secret<String>,

    /// Required `iss` claim, if any
    pub issuer: Option<String>,

    /// Required `aud` claim, if any
    pub audience: Option<String>,

    /// Clock skew tolerance in seconds
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// Builds the token validator configuration.
    pub fn jwt_config(&self) -> JwtConfig {
        let mut config =
            JwtConfig::new(self.jwt_secret.expose_secret().clone()).with_leeway(self.leeway_secs);
        if let Some(issuer) = &self.issuer {
            config = config.with_issuer(issuer.clone());
        }
        if let Some(audience) = &self.audience {
            config = config.with_audience(audience.clone());
        }
        config
    }

    /// Validate authentication configuration
    ///
    /// Any non-empty secret is accepted in development. Staging and
    /// production require at least [`MIN_SECRET_BYTES`].
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment != Environment::Development && secret.len() < MIN_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort(MIN_SECRET_BYTES));
        }
        Ok(())
    }
}

fn default_leeway() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: Secret::new(secret.to_string()),
            issuer: None,
            audience: None,
            leeway_secs: default_leeway(),
        }
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            config("").validate(&Environment::Development),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_short_secret_allowed_only_in_development() {
        let config = config("dev-secret");
        assert!(config.validate(&Environment::Development).is_ok());
        assert!(matches!(
            config.validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort(32))
        ));
    }

    #[test]
    fn test_long_secret_valid_everywhere() {
        let config = config(&"k".repeat(48));
        assert!(config.validate(&Environment::Staging).is_ok());
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_jwt_config_carries_claim_requirements() {
        let config = AuthConfig {
            issuer: Some("nutri-auth".to_string()),
            leeway_secs: 5,
            ..config("dev-secret")
        };
        let jwt = config.jwt_config();
        assert_eq!(jwt.issuer.as_deref(), Some("nutri-auth"));
        assert!(jwt.audience.is_none());
        assert_eq!(jwt.leeway_secs, 5);
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let debug = format!("{:?}", config("super-secret-value"));
        assert!(!debug.contains("super-secret-value"));
    }
}
