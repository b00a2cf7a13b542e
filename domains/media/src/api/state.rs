//! Media domain state and auth backend integration

use crate::repository::MediaRepositories;
use crate::storage::FileStore;
use axum::extract::FromRef;
use memora_auth::AuthBackend;

/// Application state for the media domain
#[derive(Clone)]
pub struct MediaState {
    pub repos: MediaRepositories,
    pub auth: AuthBackend,
    pub files: FileStore,
}

impl FromRef<MediaState> for AuthBackend {
    fn from_ref(state: &MediaState) -> Self {
        state.auth.clone()
    }
}
