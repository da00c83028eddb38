//! Member Entity
//!
//! Library members. Structurally close to `User` but a separate aggregate:
//! members do not log in.

use std::collections::HashSet;

use crate::role::entity::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Store-assigned id; `None` until persisted
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub roles: HashSet<Role>,
}

impl Member {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            roles: HashSet::new(),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }
}
