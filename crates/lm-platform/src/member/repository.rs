//! Member Repository

use async_trait::async_trait;
use crate::member::entity::Member;
use crate::shared::error::Result;

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn count(&self) -> Result<u64>;

    /// Insert when `id` is `None`, otherwise replace the stored member
    /// (role links included). Updating an unknown id fails with `NotFound`.
    async fn save(&self, member: Member) -> Result<Member>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Member>>;

    /// All members ordered by id
    async fn find_all(&self) -> Result<Vec<Member>>;

    /// Returns whether a member was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}
