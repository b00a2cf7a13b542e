//! User repository

use crate::domain::entities::User;
use memora_common::{is_unique_violation, RepositoryError};
use sqlx::PgPool;

/// All columns in the users table, used for SELECT and RETURNING clauses.
const USER_COLUMNS: &str = "\
    id, email, password_hash, name, \
    phone, age, address, city, country, \
    created_at, updated_at, deleted_at";

/// Fields for creating a user. Email must already be normalized and
/// the password already hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Partial update of profile fields; `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user and its default role association in one
    /// transaction — partial failure leaves no orphaned identity.
    ///
    /// Returns `RepositoryError::AlreadyExists` when the normalized
    /// email is already taken by a live row.
    pub async fn create(
        &self,
        new_user: &NewUser,
        default_role: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO users (email, password_hash, name, phone, age, address, city, country) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        );
        let user: User = sqlx::query_as(&query)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.name)
            .bind(&new_user.phone)
            .bind(new_user.age)
            .bind(&new_user.address)
            .bind(&new_user.city)
            .bind(&new_user.country)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepositoryError::AlreadyExists
                } else {
                    RepositoryError::Connection(e)
                }
            })?;

        let result = sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) \
             SELECT $1, id FROM roles WHERE name = $2",
        )
        .bind(user.id)
        .bind(default_role)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls the user row back too.
            return Err(RepositoryError::InvalidData(format!(
                "Default role '{default_role}' does not exist"
            )));
        }

        tx.commit().await?;
        Ok(user)
    }

    /// Get a live (non-tombstoned) user by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user by ID regardless of tombstone state. Used by the
    /// admin hard-delete flow.
    pub async fn find_by_id_include_deleted(
        &self,
        id: i64,
    ) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find a live user by normalized email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// List live users, oldest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, RepositoryError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE deleted_at IS NULL ORDER BY id ASC LIMIT $1 OFFSET $2"
        );
        let users = sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Count live users.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    /// Apply a partial profile update to a live user.
    ///
    /// Returns `RepositoryError::AlreadyExists` when an email change
    /// collides with another live row.
    pub async fn update(
        &self,
        id: i64,
        changes: &UpdateUser,
    ) -> Result<Option<User>, RepositoryError> {
        let query = format!(
            "UPDATE users SET \
                email = COALESCE($2, email), \
                password_hash = COALESCE($3, password_hash), \
                name = COALESCE($4, name), \
                phone = COALESCE($5, phone), \
                age = COALESCE($6, age), \
                address = COALESCE($7, address), \
                city = COALESCE($8, city), \
                country = COALESCE($9, country), \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {USER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&changes.email)
            .bind(&changes.password_hash)
            .bind(&changes.name)
            .bind(&changes.phone)
            .bind(changes.age)
            .bind(&changes.address)
            .bind(&changes.city)
            .bind(&changes.country)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepositoryError::AlreadyExists
                } else {
                    RepositoryError::Connection(e)
                }
            })?;

        Ok(updated)
    }

    /// Soft-delete a live user. Returns false when no live row matched.
    pub async fn soft_delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Permanently purge a user row (role associations cascade).
    pub async fn hard_delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
