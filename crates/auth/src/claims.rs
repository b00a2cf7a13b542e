//! JWT claims types

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Issuer string embedded in every token this service signs.
pub const ISSUER: &str = "memora";

/// Discriminator distinguishing short-lived access tokens from the
/// long-lived refresh tokens exchanged for a new pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Signed token payload.
///
/// `roles` is a snapshot at issuance time; authorization decisions
/// re-check the persisted role set on every request, so these claims
/// only describe who the token was minted for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, stringified)
    pub sub: String,
    /// Email at issuance
    pub email: String,
    /// Display name at issuance
    pub name: String,
    /// Role names held at issuance
    pub roles: Vec<String>,
    /// Issuer
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: u64,
    /// Expires at (unix seconds)
    pub exp: u64,
    /// Access or refresh
    pub kind: TokenKind,
}

impl Claims {
    /// Parse the subject back into a user ID.
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidUserId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TokenKind::Access).unwrap(),
            "\"access\""
        );
        assert_eq!(
            serde_json::to_string(&TokenKind::Refresh).unwrap(),
            "\"refresh\""
        );
    }

    #[test]
    fn test_user_id_parses_subject() {
        let claims = Claims {
            sub: "42".to_string(),
            email: "test@example.com".to_string(),
            name: "Test".to_string(),
            roles: vec!["user".to_string()],
            iss: ISSUER.to_string(),
            iat: 0,
            exp: 0,
            kind: TokenKind::Access,
        };
        assert_eq!(claims.user_id().unwrap(), 42);
    }

    #[test]
    fn test_user_id_rejects_non_numeric_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            email: "test@example.com".to_string(),
            name: "Test".to_string(),
            roles: vec![],
            iss: ISSUER.to_string(),
            iat: 0,
            exp: 0,
            kind: TokenKind::Access,
        };
        assert!(matches!(claims.user_id(), Err(AuthError::InvalidUserId)));
    }
}
