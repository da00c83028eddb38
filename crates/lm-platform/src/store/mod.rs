//! Store Implementations
//!
//! Both stores implement every repository contract. `Repositories` hands
//! one store out to the rest of the crate as trait objects.

pub mod memory;
pub mod sqlite;
#[cfg(test)]
pub(crate) mod failing;

use std::sync::Arc;

use crate::member::MemberRepository;
use crate::role::RoleRepository;
use crate::user::UserRepository;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// Repository handles, all backed by the same store
#[derive(Clone)]
pub struct Repositories {
    pub roles: Arc<dyn RoleRepository>,
    pub users: Arc<dyn UserRepository>,
    pub members: Arc<dyn MemberRepository>,
}

impl Repositories {
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: RoleRepository + UserRepository + MemberRepository + 'static,
    {
        Self {
            roles: store.clone(),
            users: store.clone(),
            members: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }
}
