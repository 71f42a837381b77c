//! Shared-secret JWT adapter for the `SessionValidator` port.
//!
//! Tokens are issued by the account service and signed with HS256 using a
//! secret both sides know. This adapter checks the signature and expiry, and
//! the issuer and audience when they are configured.
//!
//! The user identity is the `sub` claim, or the `user_id` claim that some
//! issuers emit instead (string or integer).

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Configuration for HS256 token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    secret: Secret<String>,
    /// Required `iss` claim, if any.
    pub issuer: Option<String>,
    /// Required `aud` claim, if any.
    pub audience: Option<String>,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret.into()),
            issuer: None,
            audience: None,
            leeway_secs: 30,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    username: Option<String>,
    exp: i64,
}

impl Claims {
    fn subject(&self) -> Option<String> {
        if let Some(sub) = &self.sub {
            return Some(sub.clone());
        }
        match &self.user_id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// HS256 session validator.
pub struct JwtSessionValidator {
    config: JwtConfig,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);
        match &config.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            config,
            decoding_key,
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = data.claims;
        let subject = claims.subject().ok_or_else(|| {
            tracing::warn!("Token has neither 'sub' nor 'user_id' claim");
            AuthError::InvalidToken
        })?;

        let user_id = UserId::new(subject).map_err(|_| {
            tracing::warn!("Empty subject in token");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, claims.username))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-key";

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn sign(claims: Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_token_with_sub() {
        let validator = JwtSessionValidator::new(JwtConfig::new(SECRET));
        let token = sign(json!({"sub": "user-7", "username": "ada", "exp": now() + 600}), SECRET);

        let user = validator.validate(&token).await.unwrap();
        assert_eq!(user.id.as_str(), "user-7");
        assert_eq!(user.username.as_deref(), Some("ada"));
    }

    #[tokio::test]
    async fn accepts_numeric_user_id_claim() {
        let validator = JwtSessionValidator::new(JwtConfig::new(SECRET));
        let token = sign(json!({"user_id": 42, "token_type": "access", "exp": now() + 600}), SECRET);

        let user = validator.validate(&token).await.unwrap();
        assert_eq!(user.id.as_str(), "42");
    }

    #[tokio::test]
    async fn rejects_wrong_signature() {
        let validator = JwtSessionValidator::new(JwtConfig::new(SECRET));
        let token = sign(json!({"sub": "user-7", "exp": now() + 600}), "other-secret");

        assert!(matches!(validator.validate(&token).await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let validator = JwtSessionValidator::new(JwtConfig::new(SECRET).with_leeway(0));
        let token = sign(json!({"sub": "user-7", "exp": now() - 3600}), SECRET);

        assert!(matches!(validator.validate(&token).await, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn enforces_configured_issuer_and_audience() {
        let validator = JwtSessionValidator::new(
            JwtConfig::new(SECRET)
                .with_issuer("https://accounts.example.com")
                .with_audience("nutri-connect"),
        );

        let good = sign(
            json!({"sub": "u", "iss": "https://accounts.example.com", "aud": "nutri-connect", "exp": now() + 600}),
            SECRET,
        );
        let wrong_aud = sign(
            json!({"sub": "u", "iss": "https://accounts.example.com", "aud": "other", "exp": now() + 600}),
            SECRET,
        );

        assert!(validator.validate(&good).await.is_ok());
        assert!(matches!(validator.validate(&wrong_aud).await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn rejects_token_without_subject() {
        let validator = JwtSessionValidator::new(JwtConfig::new(SECRET));
        let token = sign(json!({"exp": now() + 600}), SECRET);

        assert!(matches!(validator.validate(&token).await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let validator = JwtSessionValidator::new(JwtConfig::new(SECRET));
        assert!(validator.validate("not-a-jwt").await.is_err());
    }

    #[test]
    fn secret_is_not_debug_printed() {
        let config = JwtConfig::new("very-secret");
        assert!(!format!("{:?}", config).contains("very-secret"));
    }
}
