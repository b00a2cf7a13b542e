//! Token issuance and validation

use axum::http::HeaderValue;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{Claims, TokenKind, ISSUER};
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Access tokens expire 15 minutes after issuance.
const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Refresh tokens expire 7 days after issuance.
const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// An access/refresh token pair, both freshly minted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issue a fresh access + refresh pair for the given identity.
///
/// Role names are snapshotted into the claims; they describe who the
/// token was minted for and are not consulted for authorization.
pub fn issue_pair(
    user_id: i64,
    email: &str,
    name: &str,
    roles: &[String],
    config: &AuthConfig,
) -> Result<TokenPair, AuthError> {
    let access_token = issue_token(
        user_id,
        email,
        name,
        roles,
        TokenKind::Access,
        ACCESS_TOKEN_TTL_SECS,
        config,
    )?;
    let refresh_token = issue_token(
        user_id,
        email,
        name,
        roles,
        TokenKind::Refresh,
        REFRESH_TOKEN_TTL_SECS,
        config,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn issue_token(
    user_id: i64,
    email: &str,
    name: &str,
    roles: &[String],
    kind: TokenKind,
    ttl_secs: i64,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        roles: roles.to_vec(),
        iss: ISSUER.to_string(),
        iat: now.timestamp() as u64,
        exp: (now + Duration::seconds(ttl_secs)).timestamp() as u64,
        kind,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| {
        tracing::error!(error = %e, kind = %kind, "Token signing failed");
        AuthError::TokenCreation
    })
}

/// Validate a token and return its claims.
///
/// Rejects tokens whose header names any algorithm other than HS256,
/// whose signature does not verify under the configured secret, whose
/// issuer differs, or whose kind does not match `expected_kind` (an
/// access-token validator rejects a presented refresh token and vice
/// versa). Expiry is surfaced distinctly so clients can decide to
/// attempt a refresh.
pub fn validate_token(
    token: &str,
    expected_kind: TokenKind,
    config: &AuthConfig,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "Token validation failed");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    })?;

    if token_data.claims.kind != expected_kind {
        tracing::debug!(
            expected = %expected_kind,
            presented = %token_data.claims.kind,
            "Token kind mismatch"
        );
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}

/// Extract a bearer token from the Authorization header.
///
/// The header must be exactly `Bearer <token>`.
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    if let Some(token) = header_str.strip_prefix("Bearer ") {
        Ok(token.to_string())
    } else {
        Err(AuthError::InvalidAuthorizationFormat)
    }
}
