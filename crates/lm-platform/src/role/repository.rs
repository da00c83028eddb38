//! Role Repository

use async_trait::async_trait;
use crate::role::entity::Role;
use crate::shared::error::Result;

/// Role persistence contract.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn count(&self) -> Result<u64>;

    /// Insert a new role and return it with its assigned id.
    /// Fails with `Duplicate` if the name is taken.
    async fn save(&self, role: Role) -> Result<Role>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>>;

    /// All roles ordered by id
    async fn find_all(&self) -> Result<Vec<Role>>;
}
