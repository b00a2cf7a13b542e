//! Auth read-model types
//!
//! Lightweight view of the same `users` rows owned by the accounts
//! domain. Carries only what authentication and authorization need —
//! notably, there is no password hash field at all, so the resolved
//! identity can be serialized outbound without a denylist.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identity resolved from the store for an authenticated request.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AuthIdentity {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_serialization_has_no_password_field() {
        let identity = AuthIdentity {
            id: 1,
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            phone: None,
            age: None,
            address: None,
            city: None,
            country: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&identity).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(keys.contains(&"email"));
        assert!(!keys.iter().any(|k| k.contains("password")));
    }
}
