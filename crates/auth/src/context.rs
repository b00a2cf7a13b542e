//! Authorization context for authenticated requests

use crate::types::AuthIdentity;

/// Reserved role granting the ownership-bypass rule.
pub const ADMIN_ROLE: &str = "admin";

/// Baseline role assigned to every new identity.
pub const DEFAULT_ROLE: &str = "user";

/// Represents an authenticated request: the identity re-resolved from
/// the store plus the role names it holds *right now* (not the token's
/// issuance-time snapshot).
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
    pub roles: Vec<String>,
}

impl AuthContext {
    pub fn new(user: AuthIdentity, roles: Vec<String>) -> Self {
        Self { user, roles }
    }

    /// Case-sensitive exact match against the currently loaded role set.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if the identity holds the reserved admin role.
    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// Ownership policy for resource mutation: the requester must be
    /// the resource's owner or hold the admin role.
    pub fn can_modify(&self, owner_id: i64) -> bool {
        self.user.id == owner_id || self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_identity(id: i64) -> AuthIdentity {
        AuthIdentity {
            id,
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            phone: None,
            age: None,
            address: None,
            city: None,
            country: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_role_exact_match() {
        let ctx = AuthContext::new(
            create_test_identity(1),
            vec!["user".to_string(), "moderator".to_string()],
        );

        assert!(ctx.has_role("user"));
        assert!(ctx.has_role("moderator"));
        assert!(!ctx.has_role("admin"));
    }

    #[test]
    fn test_has_role_is_case_sensitive() {
        let ctx = AuthContext::new(create_test_identity(1), vec!["admin".to_string()]);

        assert!(ctx.has_role("admin"));
        assert!(!ctx.has_role("Admin"));
        assert!(!ctx.has_role("ADMIN"));
    }

    #[test]
    fn test_owner_can_modify_own_resource() {
        let ctx = AuthContext::new(create_test_identity(5), vec!["user".to_string()]);

        assert!(ctx.can_modify(5));
        assert!(!ctx.can_modify(6));
    }

    #[test]
    fn test_admin_can_modify_any_resource() {
        let ctx = AuthContext::new(
            create_test_identity(5),
            vec!["user".to_string(), "admin".to_string()],
        );

        assert!(ctx.can_modify(5));
        assert!(ctx.can_modify(6));
        assert!(ctx.is_admin());
    }

    #[test]
    fn test_non_owner_non_admin_cannot_modify() {
        let ctx = AuthContext::new(create_test_identity(5), vec!["user".to_string()]);

        assert!(!ctx.is_admin());
        assert!(!ctx.can_modify(99));
    }

    #[test]
    fn test_empty_role_set() {
        let ctx = AuthContext::new(create_test_identity(5), vec![]);

        assert!(!ctx.has_role("user"));
        assert!(!ctx.is_admin());
        // Ownership still applies without any roles
        assert!(ctx.can_modify(5));
    }
}
