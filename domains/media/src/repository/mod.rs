//! Repository implementations for the media domain

pub mod albums;
pub mod media;

use sqlx::PgPool;

pub use albums::AlbumRepository;
pub use media::{MediaRepository, NewMedia};

/// Combined repository access for the media domain
#[derive(Clone)]
pub struct MediaRepositories {
    pub media: MediaRepository,
    pub albums: AlbumRepository,
}

impl MediaRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            media: MediaRepository::new(pool.clone()),
            albums: AlbumRepository::new(pool),
        }
    }
}
