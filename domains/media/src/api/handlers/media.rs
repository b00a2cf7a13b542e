//! Media management API handlers
//!
//! Implements:
//! - POST /api/media — Upload a file (authenticated)
//! - GET /api/media — Public paginated listing
//! - GET /api/media/files/{name} — Serve a stored file (public)
//! - GET /api/media/{id} — Download the file content (authenticated)
//! - GET /api/media/{id}/details — Metadata (authenticated)
//! - PUT /api/media/{id} — Rename (owner or admin)
//! - DELETE /api/media/{id} — Soft delete (owner or admin)
//!
//! Reads are intentionally not owner-restricted; only mutation is
//! gated (public read, owned write).

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use memora_auth::AuthUser;
use memora_common::{Error, Pagination, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::state::MediaState;
use crate::domain::entities::{media_type_from_mime, Media};
use crate::repository::NewMedia;

/// Media response DTO
#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub id: i64,
    pub owner_id: i64,
    pub filename: String,
    pub stored_name: String,
    pub url: String,
    pub media_type: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Media> for MediaResponse {
    fn from(m: Media) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            filename: m.filename,
            stored_name: m.stored_name,
            url: m.url,
            media_type: m.media_type,
            mime_type: m.mime_type,
            size: m.size,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Response for the public listing
#[derive(Debug, Serialize)]
pub struct MediaListResponse {
    pub files: Vec<MediaResponse>,
    pub total: i64,
}

/// Request for renaming a media record
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMediaRequest {
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
}

/// POST /api/media — Upload a file
///
/// The file is persisted first, then the metadata row. The two writes
/// are not atomic: if the insert fails, the stored file is deleted
/// again (compensating action) so no orphan remains.
pub async fn upload(
    AuthUser(ctx): AuthUser,
    State(state): State<MediaState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaResponse>), Error> {
    let mut file_part = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::Validation(format!("Failed to read upload: {e}")))?;
            file_part = Some((filename, mime_type, data));
        }
    }

    let Some((filename, mime_type, data)) = file_part else {
        return Err(Error::Validation("No file uploaded".to_string()));
    };

    let stored_name = state.files.unique_name(ctx.user.id, &filename);
    state.files.save(&stored_name, &data).await.map_err(|e| {
        tracing::error!(error = %e, stored_name = %stored_name, "Failed to store upload");
        Error::Internal("Failed to store file".to_string())
    })?;

    let new_media = NewMedia {
        owner_id: ctx.user.id,
        filename,
        stored_name: stored_name.clone(),
        url: format!("/api/media/files/{stored_name}"),
        media_type: media_type_from_mime(&mime_type).to_string(),
        mime_type,
        size: data.len() as i64,
    };

    let media = match state.repos.media.create(&new_media).await {
        Ok(media) => media,
        Err(e) => {
            // The metadata row failed; drop the file so it does not dangle.
            if let Err(cleanup) = state.files.remove(&stored_name).await {
                tracing::warn!(
                    error = %cleanup,
                    stored_name = %stored_name,
                    "Failed to remove orphaned upload"
                );
            }
            return Err(e.into());
        }
    };

    tracing::info!(media_id = %media.id, owner_id = %ctx.user.id, "Media uploaded");

    Ok((StatusCode::CREATED, Json(MediaResponse::from(media))))
}

/// GET /api/media — Public paginated listing, newest first
pub async fn list_public(
    State(state): State<MediaState>,
    Query(page): Query<Pagination>,
) -> Result<Json<MediaListResponse>, Error> {
    let media = state.repos.media.list(page.limit(), page.offset()).await?;
    let total = state.repos.media.count().await?;

    Ok(Json(MediaListResponse {
        files: media.into_iter().map(MediaResponse::from).collect(),
        total,
    }))
}

/// GET /api/media/files/{name} — Serve a stored file by name
pub async fn serve_file(
    State(state): State<MediaState>,
    Path(name): Path<String>,
) -> Result<([(HeaderName, String); 1], Vec<u8>), Error> {
    if state.files.path_for(&name).is_none() {
        return Err(Error::Validation("Invalid filename".to_string()));
    }

    let data = match state.files.read(&name).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound("File not found".to_string()));
        }
        Err(e) => {
            tracing::error!(error = %e, name = %name, "Failed to read stored file");
            return Err(Error::Internal("Filesystem error".to_string()));
        }
    };

    Ok((
        [(
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        )],
        data,
    ))
}

/// GET /api/media/{id} — Download the file content
pub async fn download(
    AuthUser(_ctx): AuthUser,
    State(state): State<MediaState>,
    Path(id): Path<i64>,
) -> Result<([(HeaderName, String); 2], Vec<u8>), Error> {
    let media = state
        .repos
        .media
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Media not found".to_string()))?;

    let data = match state.files.read(&media.stored_name).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Record without file: acceptable-but-logged drift.
            tracing::warn!(
                media_id = %media.id,
                stored_name = %media.stored_name,
                "Stored file missing for media record"
            );
            return Err(Error::NotFound("File not found".to_string()));
        }
        Err(e) => {
            tracing::error!(error = %e, media_id = %media.id, "Failed to read stored file");
            return Err(Error::Internal("Filesystem error".to_string()));
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, media.mime_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", media.filename),
            ),
        ],
        data,
    ))
}

/// GET /api/media/{id}/details — Metadata only
pub async fn details(
    AuthUser(_ctx): AuthUser,
    State(state): State<MediaState>,
    Path(id): Path<i64>,
) -> Result<Json<MediaResponse>, Error> {
    let media = state
        .repos
        .media
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Media not found".to_string()))?;

    Ok(Json(MediaResponse::from(media)))
}

/// PUT /api/media/{id} — Rename (owner or admin)
pub async fn update(
    AuthUser(ctx): AuthUser,
    State(state): State<MediaState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateMediaRequest>,
) -> Result<Json<MediaResponse>, Error> {
    let media = state
        .repos
        .media
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Media not found".to_string()))?;

    // The ownership check precedes any write.
    if !ctx.can_modify(media.owner_id) {
        return Err(Error::Authorization("Forbidden".to_string()));
    }

    let updated = state
        .repos
        .media
        .update_filename(id, &request.filename)
        .await?
        .ok_or_else(|| Error::NotFound("Media not found".to_string()))?;

    Ok(Json(MediaResponse::from(updated)))
}

/// DELETE /api/media/{id} — Soft delete (owner or admin)
pub async fn delete(
    AuthUser(ctx): AuthUser,
    State(state): State<MediaState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Error> {
    let media = state
        .repos
        .media
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Media not found".to_string()))?;

    if !ctx.can_modify(media.owner_id) {
        return Err(Error::Authorization("Forbidden".to_string()));
    }

    let deleted = state.repos.media.soft_delete(id).await?;
    if !deleted {
        return Err(Error::NotFound("Media not found".to_string()));
    }

    // Best-effort file cleanup; failure is logged, not surfaced.
    if let Err(e) = state.files.remove(&media.stored_name).await {
        tracing::warn!(
            error = %e,
            media_id = %media.id,
            stored_name = %media.stored_name,
            "Failed to remove stored file"
        );
    }

    tracing::info!(media_id = %media.id, user_id = %ctx.user.id, "Media deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_media_request_validation() {
        let valid = UpdateMediaRequest {
            filename: "renamed.jpg".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = UpdateMediaRequest {
            filename: "".to_string(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_media_response_serialization() {
        let media = Media {
            id: 9,
            owner_id: 3,
            filename: "cat.jpg".to_string(),
            stored_name: "3_1700000000000000000.jpg".to_string(),
            url: "/api/media/files/3_1700000000000000000.jpg".to_string(),
            media_type: "image".to_string(),
            mime_type: "image/jpeg".to_string(),
            size: 2048,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };

        let json = serde_json::to_value(MediaResponse::from(media)).unwrap();
        assert_eq!(json["media_type"], "image");
        assert_eq!(json["size"], 2048);
        assert!(json["url"].as_str().unwrap().starts_with("/api/media/files/"));
    }
}
