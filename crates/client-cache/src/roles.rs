//! Role Guard
//!
//! Pure predicate over a user's already-loaded roles.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Role(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Role::new(name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allow-list plus optional exclusive-list
///
/// Permits a user holding at least one allowed role and, when an exclusive
/// list is set, no role outside of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleGuard {
    pub allowed: Vec<Role>,
    pub exclusive: Option<Vec<Role>>,
}

impl RoleGuard {
    pub fn allow<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self {
            allowed: roles.into_iter().map(Into::into).collect(),
            exclusive: None,
        }
    }

    pub fn exclusive<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.exclusive = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn permits(&self, user_roles: &[Role]) -> bool {
        let has_allowed = user_roles.iter().any(|role| self.allowed.contains(role));
        let within_exclusive = match &self.exclusive {
            Some(exclusive) => user_roles.iter().all(|role| exclusive.contains(role)),
            None => true,
        };
        has_allowed && within_exclusive
    }
}
