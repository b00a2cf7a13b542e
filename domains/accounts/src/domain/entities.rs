//! Domain entities for the Memora accounts domain

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Normalize an email address for storage and lookup.
///
/// Addresses are compared case-insensitively: every write and every
/// lookup goes through this, so the uniqueness invariant holds on the
/// normalized form.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// User entity.
///
/// The password is represented only as an opaque Argon2 digest and is
/// never serialized outbound. `deleted_at` is the soft-delete
/// tombstone; default read paths exclude tombstoned rows.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this row has been soft-deleted.
    pub fn is_tombstoned(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Role entity. Roles are an open set of names backed by the store;
/// "user" and "admin" are seeded at startup and "admin" is the
/// reserved value for the ownership-bypass rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: 1,
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            name: "Alice".to_string(),
            phone: None,
            age: Some(30),
            address: None,
            city: Some("Skopje".to_string()),
            country: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("Alice@Example.COM"), "alice@example.com");
        assert_eq!(normalize_email("  bob@example.com  "), "bob@example.com");
        assert_eq!(normalize_email("carol@example.com"), "carol@example.com");
    }

    #[test]
    fn test_user_serialization_omits_password_hash_and_tombstone() {
        let user = test_user();
        let json = serde_json::to_value(&user).unwrap();
        let obj = json.as_object().unwrap();

        assert!(obj.contains_key("email"));
        assert!(obj.contains_key("name"));
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("deleted_at"));
    }

    #[test]
    fn test_is_tombstoned() {
        let mut user = test_user();
        assert!(!user.is_tombstoned());
        user.deleted_at = Some(Utc::now());
        assert!(user.is_tombstoned());
    }
}
