//! Route definitions for the accounts domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{auth, profile, users};
use super::state::AccountsState;

/// Create account lifecycle routes (public)
fn auth_routes() -> Router<AccountsState> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
}

/// Create profile routes (authenticated)
fn profile_routes() -> Router<AccountsState> {
    Router::new().route(
        "/api/profile",
        get(profile::get_profile).put(profile::update_profile),
    )
}

/// Create admin user-management routes (authenticated + admin role)
fn user_admin_routes() -> Router<AccountsState> {
    Router::new()
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/users/{id}/roles",
            post(users::assign_role).delete(users::remove_role),
        )
}

/// Create all accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new()
        .merge(auth_routes())
        .merge(profile_routes())
        .merge(user_admin_routes())
}
