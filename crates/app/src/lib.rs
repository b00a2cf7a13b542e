//! Memora application composition root
//!
//! Composes the domain routers into a single application.

use axum::Router;
use memora_accounts::{AccountsRepositories, AccountsState};
use memora_auth::{AuthBackend, AuthConfig, ADMIN_ROLE, DEFAULT_ROLE};
use memora_common::Config;
use memora_media::{FileStore, MediaRepositories, MediaState};
use sqlx::PgPool;

/// Create the main application router with all routes and state.
///
/// Runs pending migrations and the idempotent role reconciliation
/// before any route is served, so the baseline roles exist before the
/// first identity can be created.
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    sqlx::migrate!("../../migrations").run(&pool).await?;

    let accounts_repos = AccountsRepositories::new(pool.clone());
    accounts_repos
        .roles
        .ensure_roles(&[DEFAULT_ROLE, ADMIN_ROLE])
        .await?;

    let auth = AuthBackend::new(
        pool.clone(),
        AuthConfig {
            jwt_secret: config.jwt_secret.clone(),
        },
    );

    let files = FileStore::new(&config.upload_dir);
    files.ensure_root().await?;

    let accounts_state = AccountsState {
        repos: accounts_repos,
        auth: auth.clone(),
        password_min_length: config.password_min_length,
    };

    let media_state = MediaState {
        repos: MediaRepositories::new(pool),
        auth,
        files,
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Memora API v0.1.0" }))
        .merge(memora_accounts::routes().with_state(accounts_state))
        .merge(memora_media::routes().with_state(media_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
