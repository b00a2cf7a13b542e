//! Profile handlers
//!
//! Implements:
//! - GET /api/profile — Get the authenticated user's own record
//! - PUT /api/profile — Update the authenticated user's own record

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use memora_auth::{hash_password, AuthIdentity, AuthUser};
use memora_common::{Error, RepositoryError, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::state::AccountsState;
use crate::domain::entities::{normalize_email, User};
use crate::repository::UpdateUser;

/// Response shape for user records. Built field-by-field so the
/// password hash cannot ride along by accident.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            age: user.age,
            address: user.address,
            city: user.city,
            country: user.country,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<AuthIdentity> for UserResponse {
    fn from(user: AuthIdentity) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            age: user.age,
            address: user.address,
            city: user.city,
            country: user.country,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request for updating the caller's own profile. All fields optional;
/// omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email)]
    pub email: Option<String>,

    // Minimum length is a configurable policy checked in the handler
    #[validate(length(min = 1))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

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

/// GET /api/profile
pub async fn get_profile(AuthUser(ctx): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(ctx.user))
}

/// PUT /api/profile
pub async fn update_profile(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, Error> {
    apply_user_update(&state, ctx.user.id, request).await
}

/// Shared by profile self-update and the admin user edit: map the
/// request onto a partial update, re-hashing a changed password and
/// re-normalizing a changed email.
pub(crate) async fn apply_user_update(
    state: &AccountsState,
    user_id: i64,
    request: UpdateProfileRequest,
) -> Result<Json<UserResponse>, Error> {
    if let Some(ref password) = request.password {
        if password.chars().count() < state.password_min_length {
            return Err(Error::Validation(format!(
                "Password must be at least {} characters",
                state.password_min_length
            )));
        }
    }

    let password_hash = match request.password {
        Some(ref password) => Some(
            hash_password(password).map_err(|_| Error::Internal("Hashing failed".into()))?,
        ),
        None => None,
    };

    let changes = UpdateUser {
        email: request.email.as_deref().map(normalize_email),
        password_hash,
        name: request.name,
        phone: request.phone,
        age: request.age,
        address: request.address,
        city: request.city,
        country: request.country,
    };

    let updated = state
        .repos
        .users
        .update(user_id, &changes)
        .await
        .map_err(|e| match e {
            RepositoryError::AlreadyExists => {
                Error::Conflict("Email already registered".to_string())
            }
            other => other.into(),
        })?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user_id, "Profile updated");

    Ok(Json(UserResponse::from(updated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_serialization() {
        let user = User {
            id: 3,
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            name: "Alice".to_string(),
            phone: None,
            age: None,
            address: None,
            city: None,
            country: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["email"], "alice@example.com");
        assert_eq!(obj["name"], "Alice");
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("deleted_at"));
    }

    #[test]
    fn test_update_profile_request_validation() {
        let valid = UpdateProfileRequest {
            email: Some("new@example.com".to_string()),
            password: None,
            name: Some("New Name".to_string()),
            phone: None,
            age: Some(31),
            address: None,
            city: None,
            country: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = UpdateProfileRequest {
            email: Some("nope".to_string()),
            password: None,
            name: None,
            phone: None,
            age: None,
            address: None,
            city: None,
            country: None,
        };
        assert!(bad_email.validate().is_err());

        let empty_name = UpdateProfileRequest {
            email: None,
            password: None,
            name: Some("".to_string()),
            phone: None,
            age: None,
            address: None,
            city: None,
            country: None,
        };
        assert!(empty_name.validate().is_err());
    }
}
