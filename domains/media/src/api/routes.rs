//! Route definitions for the media domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{albums, media};
use super::state::MediaState;

/// Create media routes
fn media_routes() -> Router<MediaState> {
    Router::new()
        .route("/api/media", post(media::upload).get(media::list_public))
        .route("/api/media/files/{name}", get(media::serve_file))
        .route(
            "/api/media/{id}",
            get(media::download)
                .put(media::update)
                .delete(media::delete),
        )
        .route("/api/media/{id}/details", get(media::details))
}

/// Create album routes
fn album_routes() -> Router<MediaState> {
    Router::new()
        .route("/api/albums", post(albums::create).get(albums::list_mine))
        .route(
            "/api/albums/{id}",
            get(albums::get).put(albums::update).delete(albums::delete),
        )
        .route(
            "/api/albums/{id}/media",
            post(albums::add_media).delete(albums::remove_media),
        )
}

/// Create all media domain API routes
pub fn routes() -> Router<MediaState> {
    Router::new().merge(media_routes()).merge(album_routes())
}
