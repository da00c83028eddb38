//! Store whose reads and writes always fail, with empty counts so seeding
//! gets past its guards.

use async_trait::async_trait;

use crate::role::{Role, RoleRepository};
use crate::user::{User, UserRepository};
use crate::shared::error::{PlatformError, Result};

pub(crate) struct FailingStore;

fn unavailable<T>() -> Result<T> {
    Err(PlatformError::internal("store unavailable"))
}

#[async_trait]
impl RoleRepository for FailingStore {
    async fn count(&self) -> Result<u64> {
        Ok(0)
    }

    async fn save(&self, _role: Role) -> Result<Role> {
        unavailable()
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<Role>> {
        unavailable()
    }

    async fn find_all(&self) -> Result<Vec<Role>> {
        unavailable()
    }
}

#[async_trait]
impl UserRepository for FailingStore {
    async fn count(&self) -> Result<u64> {
        Ok(0)
    }

    async fn save(&self, _user: User) -> Result<User> {
        unavailable()
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>> {
        unavailable()
    }
}
