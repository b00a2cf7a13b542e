//! Admin user-management handlers
//!
//! All routes here require the reserved admin role. Implements:
//! - GET /api/users — List users
//! - GET /api/users/{id} — Get a user
//! - PUT /api/users/{id} — Edit a user's profile
//! - DELETE /api/users/{id} — Soft-delete (or `?hard=true` purge)
//! - POST /api/users/{id}/roles — Grant a role (idempotent)
//! - DELETE /api/users/{id}/roles — Revoke a role (idempotent)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use memora_auth::AdminUser;
use memora_common::{Error, Pagination, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::handlers::profile::{apply_user_update, UpdateProfileRequest, UserResponse};
use crate::api::state::AccountsState;

/// Response for the paginated user listing
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
}

/// Request naming a role to grant or revoke
#[derive(Debug, Deserialize, Validate)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 64))]
    pub role_name: String,
}

/// Response listing a user's current role names
#[derive(Debug, Serialize)]
pub struct RoleListResponse {
    pub roles: Vec<String>,
}

/// Query parameters for user deletion
#[derive(Debug, Deserialize)]
pub struct DeleteUserParams {
    /// Permanently purge the row instead of tombstoning it
    #[serde(default)]
    pub hard: bool,
}

/// GET /api/users
pub async fn list_users(
    AdminUser(_ctx): AdminUser,
    State(state): State<AccountsState>,
    Query(page): Query<Pagination>,
) -> Result<Json<UserListResponse>, Error> {
    let users = state.repos.users.list(page.limit(), page.offset()).await?;
    let total = state.repos.users.count().await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
    }))
}

/// GET /api/users/{id}
pub async fn get_user(
    AdminUser(_ctx): AdminUser,
    State(state): State<AccountsState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, Error> {
    let user = state
        .repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/users/{id}
pub async fn update_user(
    AdminUser(_ctx): AdminUser,
    State(state): State<AccountsState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, Error> {
    apply_user_update(&state, id, request).await
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    AdminUser(ctx): AdminUser,
    State(state): State<AccountsState>,
    Path(id): Path<i64>,
    Query(params): Query<DeleteUserParams>,
) -> Result<StatusCode, Error> {
    if params.hard {
        // Purge works on already-tombstoned rows too.
        let user = state
            .repos
            .users
            .find_by_id_include_deleted(id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        state.repos.users.hard_delete(user.id).await?;
        tracing::info!(user_id = %id, admin_id = %ctx.user.id, "User purged");
    } else {
        let deleted = state.repos.users.soft_delete(id).await?;
        if !deleted {
            return Err(Error::NotFound("User not found".to_string()));
        }
        tracing::info!(user_id = %id, admin_id = %ctx.user.id, "User soft-deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/{id}/roles
pub async fn assign_role(
    AdminUser(ctx): AdminUser,
    State(state): State<AccountsState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<RoleRequest>,
) -> Result<Json<RoleListResponse>, Error> {
    let user = state
        .repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    let role = state
        .repos
        .roles
        .find_by_name(&request.role_name)
        .await?
        .ok_or_else(|| Error::NotFound("Role not found".to_string()))?;

    state.repos.roles.assign(user.id, role.id).await?;
    tracing::info!(
        user_id = %user.id,
        role = %role.name,
        admin_id = %ctx.user.id,
        "Role assigned"
    );

    let roles = state.repos.roles.names_for_user(user.id).await?;
    Ok(Json(RoleListResponse { roles }))
}

/// DELETE /api/users/{id}/roles
pub async fn remove_role(
    AdminUser(ctx): AdminUser,
    State(state): State<AccountsState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<RoleRequest>,
) -> Result<Json<RoleListResponse>, Error> {
    let user = state
        .repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    let role = state
        .repos
        .roles
        .find_by_name(&request.role_name)
        .await?
        .ok_or_else(|| Error::NotFound("Role not found".to_string()))?;

    state.repos.roles.remove(user.id, role.id).await?;
    tracing::info!(
        user_id = %user.id,
        role = %role.name,
        admin_id = %ctx.user.id,
        "Role removed"
    );

    let roles = state.repos.roles.names_for_user(user.id).await?;
    Ok(Json(RoleListResponse { roles }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_request_validation() {
        let valid = RoleRequest {
            role_name: "moderator".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = RoleRequest {
            role_name: "".to_string(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_delete_params_default_to_soft() {
        let params: DeleteUserParams = serde_json::from_str("{}").unwrap();
        assert!(!params.hard);

        let params: DeleteUserParams = serde_json::from_str(r#"{"hard": true}"#).unwrap();
        assert!(params.hard);
    }
}
