//! Bootstrap Data Seeder
//!
//! Runs once on startup and fills an empty store with the default roles and
//! two demo accounts:
//!   Administrator: admin / admin123
//!   Regular User:  user / user123
//!
//! Roles and users are guarded independently by a count check, so a store
//! that already has roles but no users still gets its users, and vice versa.
//! Partial seed state is not detected beyond that. Store errors propagate.

use std::sync::Arc;
use tracing::{info, warn};

use crate::role::entity::names;
use crate::role::{Role, RoleRepository};
use crate::user::{User, UserRepository};
use crate::shared::error::Result;

/// Default roles, in creation order
const DEFAULT_ROLES: [(&str, &str); 3] = [
    (names::ADMIN, "System Administrator"),
    (names::USER, "Regular User"),
    (names::LIBRARIAN, "Library Staff"),
];

/// What a seeding run created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub users_created: usize,
}

pub struct DataSeeder {
    role_repo: Arc<dyn RoleRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl DataSeeder {
    pub fn new(role_repo: Arc<dyn RoleRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self { role_repo, user_repo }
    }

    pub async fn seed(&self) -> Result<SeedReport> {
        let report = SeedReport {
            roles_created: self.seed_roles().await?,
            users_created: self.seed_users().await?,
        };

        info!(
            roles_created = report.roles_created,
            users_created = report.users_created,
            "Bootstrap seeding finished"
        );
        Ok(report)
    }

    async fn seed_roles(&self) -> Result<usize> {
        if self.role_repo.count().await? > 0 {
            info!("Roles already present, skipping role seeding");
            return Ok(0);
        }

        for (name, description) in DEFAULT_ROLES {
            self.role_repo.save(Role::new(name, description)).await?;
            info!(role = name, "Created role");
        }

        info!("Created default roles");
        Ok(DEFAULT_ROLES.len())
    }

    async fn seed_users(&self) -> Result<usize> {
        if self.user_repo.count().await? > 0 {
            info!("Users already present, skipping user seeding");
            return Ok(0);
        }

        let admin_role = self.lookup_role(names::ADMIN).await?;
        let user_role = self.lookup_role(names::USER).await?;

        let accounts = [
            User::new("admin", "admin123", "admin@library.com").with_optional_role(admin_role),
            User::new("user", "user123", "user@library.com").with_optional_role(user_role),
        ];

        let created = accounts.len();
        for account in accounts {
            let account = self.user_repo.save(account).await?;
            info!(username = %account.username, "Created user");
        }

        info!("Created test users: admin/admin123, user/user123");
        Ok(created)
    }

    /// A missing role leaves the account without it.
    async fn lookup_role(&self, name: &str) -> Result<Option<Role>> {
        let role = self.role_repo.find_by_name(name).await?;
        if role.is_none() {
            warn!(role = name, "Role not found, seeding account without it");
        }
        Ok(role)
    }
}
