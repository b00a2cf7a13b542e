//! Album repository
//!
//! Albums hold an unordered many-to-many relation to media. Attach
//! and detach are idempotent: attaching an already-contained media or
//! detaching an absent one is a no-op success.

use crate::domain::entities::{Album, Media};
use memora_common::RepositoryError;
use sqlx::PgPool;

/// All columns in the albums table, used for SELECT and RETURNING clauses.
const ALBUM_COLUMNS: &str = "\
    id, owner_id, title, description, \
    created_at, updated_at, deleted_at";

/// Media columns qualified for the join against album_media.
const JOINED_MEDIA_COLUMNS: &str = "\
    m.id, m.owner_id, m.filename, m.stored_name, m.url, \
    m.media_type, m.mime_type, m.size, \
    m.created_at, m.updated_at, m.deleted_at";

#[derive(Clone)]
pub struct AlbumRepository {
    pool: PgPool,
}

impl AlbumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an album for a user.
    pub async fn create(
        &self,
        owner_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<Album, RepositoryError> {
        let query = format!(
            "INSERT INTO albums (owner_id, title, description) \
             VALUES ($1, $2, $3) \
             RETURNING {ALBUM_COLUMNS}"
        );
        let album = sqlx::query_as::<_, Album>(&query)
            .bind(owner_id)
            .bind(title)
            .bind(description)
            .fetch_one(&self.pool)
            .await?;

        Ok(album)
    }

    /// Get a live (non-tombstoned) album by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Album>, RepositoryError> {
        let query = format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE id = $1 AND deleted_at IS NULL"
        );
        let album = sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(album)
    }

    /// List a user's live albums, newest first.
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Album>, RepositoryError> {
        let query = format!(
            "SELECT {ALBUM_COLUMNS} FROM albums \
             WHERE owner_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC"
        );
        let albums = sqlx::query_as::<_, Album>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(albums)
    }

    /// Live media contained in an album.
    pub async fn media_for_album(&self, album_id: i64) -> Result<Vec<Media>, RepositoryError> {
        let query = format!(
            "SELECT {JOINED_MEDIA_COLUMNS} FROM media m \
             INNER JOIN album_media am ON m.id = am.media_id \
             WHERE am.album_id = $1 AND m.deleted_at IS NULL \
             ORDER BY m.id ASC"
        );
        let media = sqlx::query_as::<_, Media>(&query)
            .bind(album_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(media)
    }

    /// Update a live album's title and/or description; `None` leaves a
    /// column unchanged.
    pub async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Album>, RepositoryError> {
        let query = format!(
            "UPDATE albums SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {ALBUM_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .bind(title)
            .bind(description)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    /// Soft-delete a live album. Returns false when no live row matched.
    pub async fn soft_delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE albums SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Add a media item to an album. Already-attached is a no-op.
    pub async fn attach_media(&self, album_id: i64, media_id: i64) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO album_media (album_id, media_id) VALUES ($1, $2) \
             ON CONFLICT (album_id, media_id) DO NOTHING",
        )
        .bind(album_id)
        .bind(media_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a media item from an album. Absent is a no-op.
    pub async fn detach_media(&self, album_id: i64, media_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM album_media WHERE album_id = $1 AND media_id = $2")
            .bind(album_id)
            .bind(media_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
