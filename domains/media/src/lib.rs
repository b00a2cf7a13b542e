//! Media domain: uploads, file serving, albums, ownership-gated mutation

pub mod api;
pub mod domain;
pub mod repository;
pub mod storage;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Album, Media};
// Re-export repository types
pub use repository::{AlbumRepository, MediaRepositories, MediaRepository};
// Re-export storage
pub use storage::FileStore;
// Re-export API types
pub use api::routes;
pub use api::MediaState;
