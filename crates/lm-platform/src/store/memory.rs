//! In-Memory Store
//!
//! Implements every repository contract over process-local tables. Used by
//! the `memory` store backend and by tests. Ids are assigned sequentially per
//! table starting at 1, and the same uniqueness rules as the SQLite store
//! apply.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::member::{Member, MemberRepository};
use crate::role::{Role, RoleRepository};
use crate::user::{User, UserRepository};
use crate::shared::error::{PlatformError, Result};

#[derive(Default)]
struct Tables {
    roles: BTreeMap<i64, Role>,
    users: BTreeMap<i64, User>,
    members: BTreeMap<i64, Member>,
    next_role_id: i64,
    next_user_id: i64,
    next_member_id: i64,
}

impl Tables {
    fn role_named(&self, name: &str) -> Option<&Role> {
        self.roles.values().find(|r| r.name == name)
    }

    /// Swap caller-supplied roles for the stored rows, by name.
    fn resolve_roles(&self, roles: &HashSet<Role>) -> Result<HashSet<Role>> {
        roles
            .iter()
            .map(|role| {
                self.role_named(&role.name)
                    .cloned()
                    .ok_or_else(|| PlatformError::not_found("Role", role.name.clone()))
            })
            .collect()
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.tables.read().roles.len() as u64)
    }

    async fn save(&self, role: Role) -> Result<Role> {
        let mut tables = self.tables.write();
        if tables.role_named(&role.name).is_some() {
            return Err(PlatformError::duplicate("Role", "name", role.name));
        }

        let id = next_id(&mut tables.next_role_id);
        let role = role.with_id(id);
        tables.roles.insert(id, role.clone());
        debug!(role_id = id, name = %role.name, "Stored role");
        Ok(role)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>> {
        Ok(self.tables.read().role_named(name).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Role>> {
        Ok(self.tables.read().roles.values().cloned().collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.tables.read().users.len() as u64)
    }

    async fn save(&self, mut user: User) -> Result<User> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(PlatformError::duplicate("User", "username", user.username));
        }

        user.roles = tables.resolve_roles(&user.roles)?;
        let id = next_id(&mut tables.next_user_id);
        user.id = Some(id);
        tables.users.insert(id, user.clone());
        debug!(user_id = id, username = %user.username, "Stored user");
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.tables.read().members.len() as u64)
    }

    async fn save(&self, mut member: Member) -> Result<Member> {
        let mut tables = self.tables.write();
        member.roles = tables.resolve_roles(&member.roles)?;

        let id = match member.id {
            Some(id) if tables.members.contains_key(&id) => id,
            Some(id) => return Err(PlatformError::not_found("Member", id.to_string())),
            None => next_id(&mut tables.next_member_id),
        };
        member.id = Some(id);
        tables.members.insert(id, member.clone());
        Ok(member)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Member>> {
        Ok(self.tables.read().members.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Member>> {
        Ok(self.tables.read().members.values().cloned().collect())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().members.remove(&id).is_some())
    }
}
