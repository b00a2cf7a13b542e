//! Disk file store for uploaded media
//!
//! Files live flat under the configured upload directory, keyed by a
//! generated unique stored name. The metadata row is written
//! separately; callers are responsible for the compensating delete
//! when the row insert fails.

use std::path::{Path, PathBuf};

use chrono::Utc;

/// File store rooted at the configured upload directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the upload directory if it does not exist. Run once at
    /// startup before serving traffic.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Generate a unique on-disk name for an upload, keeping the
    /// original extension: `{owner_id}_{nanos}{ext}`.
    pub fn unique_name(&self, owner_id: i64, original_filename: &str) -> String {
        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{owner_id}_{nanos}{ext}")
    }

    /// Resolve a stored name to its path, rejecting path traversal:
    /// the name must be exactly its own basename.
    pub fn path_for(&self, stored_name: &str) -> Option<PathBuf> {
        let name_path = Path::new(stored_name);
        if name_path.file_name().and_then(|n| n.to_str()) != Some(stored_name) {
            return None;
        }
        Some(self.root.join(stored_name))
    }

    /// Write an uploaded file under its stored name.
    pub async fn save(&self, stored_name: &str, data: &[u8]) -> std::io::Result<()> {
        let path = self
            .root
            .join(Path::new(stored_name).file_name().unwrap_or_default());
        tokio::fs::write(path, data).await
    }

    /// Read a stored file, refusing traversal attempts.
    pub async fn read(&self, stored_name: &str) -> std::io::Result<Vec<u8>> {
        let path = self.path_for(stored_name).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid stored name")
        })?;
        tokio::fs::read(path).await
    }

    /// Remove a stored file. A missing file is a no-op success so
    /// delete flows stay idempotent.
    pub async fn remove(&self, stored_name: &str) -> std::io::Result<()> {
        let Some(path) = self.path_for(stored_name) else {
            return Ok(());
        };
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_unique_name_keeps_extension() {
        let (_dir, store) = store();
        let name = store.unique_name(7, "holiday.JPG");
        assert!(name.starts_with("7_"));
        assert!(name.ends_with(".JPG"));

        let bare = store.unique_name(7, "README");
        assert!(bare.starts_with("7_"));
        assert!(!bare.contains('.'));
    }

    #[test]
    fn test_unique_name_differs_between_calls() {
        let (_dir, store) = store();
        let a = store.unique_name(7, "a.png");
        let b = store.unique_name(7, "a.png");
        assert_ne!(a, b);
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let (_dir, store) = store();
        assert!(store.path_for("ok.png").is_some());
        assert!(store.path_for("../etc/passwd").is_none());
        assert!(store.path_for("a/b.png").is_none());
        assert!(store.path_for("..").is_none());
    }

    #[tokio::test]
    async fn test_save_read_remove_roundtrip() {
        let (_dir, store) = store();
        store.ensure_root().await.unwrap();

        store.save("1_42.bin", b"hello").await.unwrap();
        assert_eq!(store.read("1_42.bin").await.unwrap(), b"hello");

        store.remove("1_42.bin").await.unwrap();
        assert!(store.read("1_42.bin").await.is_err());

        // Removing again is a no-op, not an error
        store.remove("1_42.bin").await.unwrap();
    }

    #[tokio::test]
    async fn test_read_rejects_traversal() {
        let (_dir, store) = store();
        store.ensure_root().await.unwrap();
        let err = store.read("../secret").await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
