//! Domain entities for the Memora media domain

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Media entity. `owner_id` is immutable after creation; mutation is
/// gated on it. `stored_name` is the unique on-disk name, distinct
/// from the user-visible `filename`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Media {
    pub id: i64,
    pub owner_id: i64,
    pub filename: String,
    pub stored_name: String,
    pub url: String,
    /// Coarse kind derived from the MIME type, e.g. "image", "video"
    pub media_type: String,
    pub mime_type: String,
    /// Size in bytes
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Album entity: a named collection of media owned by a user. The
/// album↔media relation is many-to-many and unordered.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Album {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Derive the coarse media kind from a MIME type.
pub fn media_type_from_mime(mime: &str) -> &'static str {
    match mime.split('/').next() {
        Some("image") => "image",
        Some("video") => "video",
        Some("audio") => "audio",
        _ => "file",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(media_type_from_mime("image/jpeg"), "image");
        assert_eq!(media_type_from_mime("video/mp4"), "video");
        assert_eq!(media_type_from_mime("audio/ogg"), "audio");
        assert_eq!(media_type_from_mime("application/pdf"), "file");
        assert_eq!(media_type_from_mime(""), "file");
    }

    #[test]
    fn test_media_serialization_omits_tombstone() {
        let media = Media {
            id: 1,
            owner_id: 2,
            filename: "cat.jpg".to_string(),
            stored_name: "2_1700000000000000000.jpg".to_string(),
            url: "/api/media/files/2_1700000000000000000.jpg".to_string(),
            media_type: "image".to_string(),
            mime_type: "image/jpeg".to_string(),
            size: 1024,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };

        let json = serde_json::to_value(&media).unwrap();
        assert!(!json.as_object().unwrap().contains_key("deleted_at"));
    }
}
