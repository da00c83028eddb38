//! Role Entity
//!
//! A named permission label attached to users and members.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use utoipa::ToSchema;

/// Well-known role names created at bootstrap
pub mod names {
    pub const ADMIN: &str = "ADMIN";
    pub const USER: &str = "USER";
    pub const LIBRARIAN: &str = "LIBRARIAN";
}

/// Role definition.
///
/// Identity is the name, which is unique within a store, so two values with
/// the same name are the same role whether or not they carry an id yet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Store-assigned id; `None` until persisted
    pub id: Option<i64>,

    /// Unique role name, e.g. "ADMIN"
    pub name: String,

    pub description: String,
}

impl Role {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Sorted role names, for stable API output.
pub fn sorted_names<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Vec<String> {
    let mut names: Vec<String> = roles.into_iter().map(|r| r.name.clone()).collect();
    names.sort();
    names
}
