//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::AuthBackend;
use crate::context::{AuthContext, ADMIN_ROLE};
use crate::error::AuthError;
use crate::token::extract_bearer_token;

/// Authenticated user extractor.
///
/// Extracts the bearer token, validates it as an access token, and
/// re-resolves the identity and its current role set from the store.
/// Any failure short-circuits with 401 before the handler runs.
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let auth_context = backend.authenticate(&token).await?;

        Ok(AuthUser(auth_context))
    }
}

/// Admin-gated authenticated user extractor.
///
/// Like `AuthUser` but rejects callers without the admin role with
/// 403 FORBIDDEN. Membership is checked against the role set loaded
/// from the store this request, so a role revoked mid-session takes
/// effect on the very next request even though the token itself
/// remains valid until expiry.
#[derive(Debug)]
pub struct AdminUser(pub AuthContext);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(auth_context) = AuthUser::from_request_parts(parts, state).await?;

        if !auth_context.has_role(ADMIN_ROLE) {
            return Err(AuthError::InsufficientRole);
        }

        Ok(AdminUser(auth_context))
    }
}
