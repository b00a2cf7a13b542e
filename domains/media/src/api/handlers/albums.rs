//! Album management API handlers
//!
//! Implements:
//! - POST /api/albums — Create an album
//! - GET /api/albums — List the caller's albums
//! - GET /api/albums/{id} — Get an album (any authenticated caller)
//! - PUT /api/albums/{id} — Update title/description (owner or admin)
//! - DELETE /api/albums/{id} — Soft delete (owner or admin)
//! - POST /api/albums/{id}/media — Attach a media item (owner or admin)
//! - DELETE /api/albums/{id}/media — Detach a media item (owner or admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use memora_auth::AuthUser;
use memora_common::{Error, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::handlers::media::MediaResponse;
use crate::api::state::MediaState;
use crate::domain::entities::{Album, Media};

/// Album response DTO, including the contained media
#[derive(Debug, Serialize)]
pub struct AlbumResponse {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub media: Vec<MediaResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlbumResponse {
    fn new(album: Album, media: Vec<Media>) -> Self {
        Self {
            id: album.id,
            owner_id: album.owner_id,
            title: album.title,
            description: album.description,
            media: media.into_iter().map(MediaResponse::from).collect(),
            created_at: album.created_at,
            updated_at: album.updated_at,
        }
    }
}

/// Request for creating an album
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAlbumRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Request for updating an album; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAlbumRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Request naming a media item to attach or detach
#[derive(Debug, Deserialize)]
pub struct AlbumMediaRequest {
    pub media_id: i64,
}

/// Load an album's media and build the response DTO.
async fn album_response(state: &MediaState, album: Album) -> Result<AlbumResponse, Error> {
    let media = state.repos.albums.media_for_album(album.id).await?;
    Ok(AlbumResponse::new(album, media))
}

/// POST /api/albums
pub async fn create(
    AuthUser(ctx): AuthUser,
    State(state): State<MediaState>,
    ValidatedJson(request): ValidatedJson<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<AlbumResponse>), Error> {
    let album = state
        .repos
        .albums
        .create(ctx.user.id, &request.title, request.description.as_deref())
        .await?;

    tracing::info!(album_id = %album.id, owner_id = %ctx.user.id, "Album created");

    Ok((
        StatusCode::CREATED,
        Json(AlbumResponse::new(album, Vec::new())),
    ))
}

/// GET /api/albums — The caller's own albums
pub async fn list_mine(
    AuthUser(ctx): AuthUser,
    State(state): State<MediaState>,
) -> Result<Json<Vec<AlbumResponse>>, Error> {
    let albums = state.repos.albums.list_by_owner(ctx.user.id).await?;

    let mut responses = Vec::with_capacity(albums.len());
    for album in albums {
        responses.push(album_response(&state, album).await?);
    }

    Ok(Json(responses))
}

/// GET /api/albums/{id} — Any authenticated caller may read
pub async fn get(
    AuthUser(_ctx): AuthUser,
    State(state): State<MediaState>,
    Path(id): Path<i64>,
) -> Result<Json<AlbumResponse>, Error> {
    let album = state
        .repos
        .albums
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Album not found".to_string()))?;

    Ok(Json(album_response(&state, album).await?))
}

/// PUT /api/albums/{id} — Owner or admin
pub async fn update(
    AuthUser(ctx): AuthUser,
    State(state): State<MediaState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateAlbumRequest>,
) -> Result<Json<AlbumResponse>, Error> {
    let album = state
        .repos
        .albums
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Album not found".to_string()))?;

    // The ownership check precedes any write.
    if !ctx.can_modify(album.owner_id) {
        return Err(Error::Authorization("Forbidden".to_string()));
    }

    let updated = state
        .repos
        .albums
        .update(id, request.title.as_deref(), request.description.as_deref())
        .await?
        .ok_or_else(|| Error::NotFound("Album not found".to_string()))?;

    Ok(Json(album_response(&state, updated).await?))
}

/// DELETE /api/albums/{id} — Owner or admin
pub async fn delete(
    AuthUser(ctx): AuthUser,
    State(state): State<MediaState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Error> {
    let album = state
        .repos
        .albums
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Album not found".to_string()))?;

    if !ctx.can_modify(album.owner_id) {
        return Err(Error::Authorization("Forbidden".to_string()));
    }

    let deleted = state.repos.albums.soft_delete(id).await?;
    if !deleted {
        return Err(Error::NotFound("Album not found".to_string()));
    }

    tracing::info!(album_id = %id, user_id = %ctx.user.id, "Album deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/albums/{id}/media — Attach a media item (idempotent)
pub async fn add_media(
    AuthUser(ctx): AuthUser,
    State(state): State<MediaState>,
    Path(id): Path<i64>,
    Json(request): Json<AlbumMediaRequest>,
) -> Result<Json<AlbumResponse>, Error> {
    let album = state
        .repos
        .albums
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Album not found".to_string()))?;

    if !ctx.can_modify(album.owner_id) {
        return Err(Error::Authorization("Forbidden".to_string()));
    }

    // Both sides must exist and be live.
    state
        .repos
        .media
        .find_by_id(request.media_id)
        .await?
        .ok_or_else(|| Error::NotFound("Media not found".to_string()))?;

    state
        .repos
        .albums
        .attach_media(album.id, request.media_id)
        .await?;

    Ok(Json(album_response(&state, album).await?))
}

/// DELETE /api/albums/{id}/media — Detach a media item (idempotent)
pub async fn remove_media(
    AuthUser(ctx): AuthUser,
    State(state): State<MediaState>,
    Path(id): Path<i64>,
    Json(request): Json<AlbumMediaRequest>,
) -> Result<Json<AlbumResponse>, Error> {
    let album = state
        .repos
        .albums
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Album not found".to_string()))?;

    if !ctx.can_modify(album.owner_id) {
        return Err(Error::Authorization("Forbidden".to_string()));
    }

    state
        .repos
        .albums
        .detach_media(album.id, request.media_id)
        .await?;

    Ok(Json(album_response(&state, album).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_album_request_validation() {
        let valid = CreateAlbumRequest {
            title: "Holidays 2026".to_string(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateAlbumRequest {
            title: "".to_string(),
            description: None,
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_album_response_includes_media() {
        let album = Album {
            id: 1,
            owner_id: 2,
            title: "Trips".to_string(),
            description: Some("Travel photos".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let media = vec![Media {
            id: 5,
            owner_id: 2,
            filename: "beach.jpg".to_string(),
            stored_name: "2_1.jpg".to_string(),
            url: "/api/media/files/2_1.jpg".to_string(),
            media_type: "image".to_string(),
            mime_type: "image/jpeg".to_string(),
            size: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }];

        let response = AlbumResponse::new(album, media);
        assert_eq!(response.media.len(), 1);
        assert_eq!(response.media[0].filename, "beach.jpg");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["title"], "Trips");
        assert_eq!(json["media"][0]["id"], 5);
    }
}
