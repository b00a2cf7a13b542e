//! Concrete authentication backend
//!
//! Wraps `PgPool` + `AuthConfig` and owns auth-specific SQL queries.
//! Uses runtime `sqlx::query_as` consistent with the repository read
//! pattern used across the domains.

use sqlx::PgPool;

use crate::claims::TokenKind;
use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::token::validate_token;
use crate::types::AuthIdentity;

/// Concrete authentication backend.
///
/// Wraps a database pool and auth configuration. Every authentication
/// re-resolves the identity and role set against current store state;
/// claims are never trusted beyond naming the subject.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: PgPool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Find a live (non-tombstoned) identity by ID.
    pub async fn find_user(&self, id: i64) -> Result<Option<AuthIdentity>, AuthError> {
        let user: Option<AuthIdentity> = sqlx::query_as(
            r#"
            SELECT id, email, name, phone, age, address, city, country,
                   created_at, updated_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load user");
            AuthError::UserLoadError
        })?;

        Ok(user)
    }

    /// Load the role names currently associated with a user.
    pub async fn find_role_names(&self, user_id: i64) -> Result<Vec<String>, AuthError> {
        let roles: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT r.name
            FROM roles r
            INNER JOIN user_roles ur ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to load roles");
            AuthError::RolesLoadError
        })?;

        Ok(roles)
    }

    /// Authenticate an access token: validate, then re-resolve the
    /// subject and its current roles from the store. A subject that no
    /// longer exists or has been tombstoned fails even while the token
    /// itself is still within its validity window.
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError> {
        self.resolve(token, TokenKind::Access).await
    }

    /// Authenticate a refresh token the same way; used by the token
    /// rotation flow.
    pub async fn authenticate_refresh(&self, token: &str) -> Result<AuthContext, AuthError> {
        self.resolve(token, TokenKind::Refresh).await
    }

    async fn resolve(&self, token: &str, kind: TokenKind) -> Result<AuthContext, AuthError> {
        let claims = validate_token(token, kind, &self.config)?;
        let user_id = claims.user_id()?;

        let user = self
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let roles = self.find_role_names(user_id).await?;

        Ok(AuthContext::new(user, roles))
    }
}
