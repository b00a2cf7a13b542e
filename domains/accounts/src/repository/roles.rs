//! Role repository
//!
//! Roles are an open set of names. Assignment and removal are
//! idempotent: assigning an already-held role or removing an absent
//! one is a no-op success.

use crate::domain::entities::Role;
use memora_common::RepositoryError;
use sqlx::PgPool;

#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent startup reconciliation: make sure every named role
    /// exists (first-or-create). Run once before serving traffic.
    pub async fn ensure_roles(&self, names: &[&str]) -> Result<(), RepositoryError> {
        for name in names {
            sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(name)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// Find a role by exact name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RepositoryError> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    /// Associate a role with a user. Already-assigned is a no-op.
    pub async fn assign(&self, user_id: i64, role_id: i64) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a role association from a user. Absent is a no-op.
    pub async fn remove(&self, user_id: i64, role_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Role names currently associated with a user.
    pub async fn names_for_user(&self, user_id: i64) -> Result<Vec<String>, RepositoryError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT r.name FROM roles r \
             INNER JOIN user_roles ur ON r.id = ur.role_id \
             WHERE ur.user_id = $1 ORDER BY r.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}
