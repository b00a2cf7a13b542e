//! Accounts domain: users, roles, registration, login, token refresh

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{normalize_email, Role, User};
// Re-export repository types
pub use repository::{AccountsRepositories, RoleRepository, UserRepository};
// Re-export API types
pub use api::routes;
pub use api::AccountsState;
