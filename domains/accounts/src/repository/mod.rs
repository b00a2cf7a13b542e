//! Repository implementations for the accounts domain

pub mod roles;
pub mod users;

use sqlx::PgPool;

pub use roles::RoleRepository;
pub use users::{NewUser, UpdateUser, UserRepository};

/// Combined repository access for the accounts domain
#[derive(Clone)]
pub struct AccountsRepositories {
    pub users: UserRepository,
    pub roles: RoleRepository,
}

impl AccountsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            roles: RoleRepository::new(pool),
        }
    }
}
