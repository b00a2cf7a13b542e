//! Media repository

use crate::domain::entities::Media;
use memora_common::RepositoryError;
use sqlx::PgPool;

/// All columns in the media table, used for SELECT and RETURNING clauses.
const MEDIA_COLUMNS: &str = "\
    id, owner_id, filename, stored_name, url, \
    media_type, mime_type, size, \
    created_at, updated_at, deleted_at";

/// Fields for creating a media record after its file has been stored.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub owner_id: i64,
    pub filename: String,
    pub stored_name: String,
    pub url: String,
    pub media_type: String,
    pub mime_type: String,
    pub size: i64,
}

#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a metadata record for an already-stored file.
    pub async fn create(&self, new_media: &NewMedia) -> Result<Media, RepositoryError> {
        let query = format!(
            "INSERT INTO media (owner_id, filename, stored_name, url, media_type, mime_type, size) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {MEDIA_COLUMNS}"
        );
        let media = sqlx::query_as::<_, Media>(&query)
            .bind(new_media.owner_id)
            .bind(&new_media.filename)
            .bind(&new_media.stored_name)
            .bind(&new_media.url)
            .bind(&new_media.media_type)
            .bind(&new_media.mime_type)
            .bind(new_media.size)
            .fetch_one(&self.pool)
            .await?;

        Ok(media)
    }

    /// Get a live (non-tombstoned) media record by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Media>, RepositoryError> {
        let query = format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1 AND deleted_at IS NULL"
        );
        let media = sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(media)
    }

    /// List live media for public consumption, newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Media>, RepositoryError> {
        let query = format!(
            "SELECT {MEDIA_COLUMNS} FROM media \
             WHERE deleted_at IS NULL ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let media = sqlx::query_as::<_, Media>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(media)
    }

    /// Count live media records.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM media WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    /// Rename a live media record.
    pub async fn update_filename(
        &self,
        id: i64,
        filename: &str,
    ) -> Result<Option<Media>, RepositoryError> {
        let query = format!(
            "UPDATE media SET filename = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {MEDIA_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(filename)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    /// Soft-delete a live media record. Returns false when no live row
    /// matched.
    pub async fn soft_delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE media SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
