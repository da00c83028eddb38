//! User Repository

use async_trait::async_trait;
use crate::user::entity::User;
use crate::shared::error::Result;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count(&self) -> Result<u64>;

    /// Insert a new user together with its role links.
    /// Fails with `Duplicate` if the username is taken.
    async fn save(&self, user: User) -> Result<User>;

    /// Exact, case-sensitive match
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}
