//! Account lifecycle handlers
//!
//! Implements:
//! - POST /api/auth/register — Create an account and issue a token pair
//! - POST /api/auth/login — Exchange credentials for a token pair
//! - POST /api/auth/refresh — Rotate a refresh token into a fresh pair

use axum::{extract::State, http::StatusCode, Json};
use memora_auth::{hash_password, issue_pair, verify_password, AuthError, TokenPair, DEFAULT_ROLE};
use memora_common::{Error, RepositoryError, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::handlers::profile::UserResponse;
use crate::api::state::AccountsState;
use crate::domain::entities::normalize_email;
use crate::repository::NewUser;

/// Request for account registration
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    // Minimum length is a configurable policy checked in the handler
    #[validate(length(min = 1))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,
}

/// Request for login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Request for token refresh
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response carrying a freshly issued token pair
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Response for successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// The one error login ever returns to a caller, regardless of which
/// factor failed — identical code and message for unknown email and
/// wrong password, so callers cannot enumerate accounts.
fn invalid_credentials() -> Error {
    Error::Authentication("Invalid email or password".to_string())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), Error> {
    if request.password.chars().count() < state.password_min_length {
        return Err(Error::Validation(format!(
            "Password must be at least {} characters",
            state.password_min_length
        )));
    }

    let email = normalize_email(&request.email);
    let password_hash =
        hash_password(&request.password).map_err(|_| Error::Internal("Hashing failed".into()))?;

    let new_user = NewUser {
        email,
        password_hash,
        name: request.name,
        phone: request.phone,
        age: request.age,
        address: request.address,
        city: request.city,
        country: request.country,
    };

    let user = state
        .repos
        .users
        .create(&new_user, DEFAULT_ROLE)
        .await
        .map_err(|e| match e {
            RepositoryError::AlreadyExists => {
                Error::Conflict("Email already registered".to_string())
            }
            other => other.into(),
        })?;

    let roles = state.repos.roles.names_for_user(user.id).await?;
    let tokens = issue_pair(user.id, &user.email, &user.name, &roles, state.auth.config())
        .map_err(|_| Error::Internal("Token issuance failed".into()))?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, Error> {
    let email = normalize_email(&request.email);

    // Tombstoned rows are excluded here, so a deleted account fails
    // exactly like an unknown one.
    let Some(user) = state.repos.users.find_by_email(&email).await? else {
        tracing::debug!("Login failed: unknown email");
        return Err(invalid_credentials());
    };

    if !verify_password(&request.password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "Login failed: password mismatch");
        return Err(invalid_credentials());
    }

    let roles = state.repos.roles.names_for_user(user.id).await?;
    let tokens = issue_pair(user.id, &user.email, &user.name, &roles, state.auth.config())
        .map_err(|_| Error::Internal("Token issuance failed".into()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse::from(tokens)))
}

/// POST /api/auth/refresh
///
/// Validates the presented token as kind=refresh, re-resolves the
/// subject (it must still exist and not be tombstoned), and rotates
/// both tokens.
pub async fn refresh(
    State(state): State<AccountsState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let ctx = state
        .auth
        .authenticate_refresh(&request.refresh_token)
        .await?;

    let tokens = issue_pair(
        ctx.user.id,
        &ctx.user.email,
        &ctx.user.name,
        &ctx.roles,
        state.auth.config(),
    )?;

    Ok(Json(TokenResponse::from(tokens)))
}
