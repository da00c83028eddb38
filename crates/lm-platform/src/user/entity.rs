//! User Entity
//!
//! Login accounts. Passwords are stored and compared as plaintext; this is a
//! demo placeholder and must not be mistaken for a credential store.

use std::collections::HashSet;
use std::fmt;

use crate::role::entity::Role;

#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned id; `None` until persisted
    pub id: Option<i64>,

    /// Unique, case-sensitive login name
    pub username: String,

    /// Plaintext password. `None` means no password was ever set, and such an
    /// account can never authenticate.
    pub password: Option<String>,

    pub email: String,

    pub roles: HashSet<Role>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            username: username.into(),
            password: Some(password.into()),
            email: email.into(),
            roles: HashSet::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Attach the role if there is one; `None` leaves the set untouched.
    pub fn with_optional_role(mut self, role: Option<Role>) -> Self {
        if let Some(role) = role {
            self.roles.insert(role);
        }
        self
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    /// Exact string comparison against the stored password.
    /// An unset stored password never matches.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_deref() == Some(candidate)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish()
    }
}
