//! Authentication types for the domain layer.
//!
//! An [`AuthenticatedUser`] is what remains of a bearer token once the
//! `SessionValidator` port has accepted it. Token issuance happens elsewhere;
//! this crate only validates.

use super::UserId;
use thiserror::Error;

/// User extracted from a validated bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Subject claim of the token.
    pub id: UserId,

    /// Username, when the issuer includes one.
    pub username: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, username: Option<String>) -> Self {
        Self { id, username }
    }

    /// Username if present, otherwise the raw subject.
    pub fn username_or_id(&self) -> &str {
        self.username.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Errors raised while validating a bearer token.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token was well formed but is past its expiry.
    #[error("Token expired")]
    TokenExpired,

    /// Validation could not run (bad configuration and the like).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_falls_back_to_subject() {
        let user = AuthenticatedUser::new(UserId::new("42").unwrap(), None);
        assert_eq!(user.username_or_id(), "42");

        let named = AuthenticatedUser::new(UserId::new("42").unwrap(), Some("ada".into()));
        assert_eq!(named.username_or_id(), "ada");
    }

    #[test]
    fn auth_error_messages_are_generic() {
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
    }
}
