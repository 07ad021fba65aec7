//! crates/reconcile/src/assignment.rs
//!
//! Requested users per role.

use std::collections::{BTreeMap, BTreeSet};

use permissions::Role;
use serde::Serialize;

use crate::error::{AclError, AclResult};

/// Users grouped by role.
///
/// Used both for requests to [`crate::ProjectAcl::set_roles`] and, with
/// every role present, for reports from [`crate::ProjectAcl::get_roles`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleAssignment {
    roles: BTreeMap<Role, BTreeSet<String>>,
}

impl RoleAssignment {
    /// An empty assignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An assignment listing every role, each with no users.
    #[must_use]
    pub fn with_all_roles() -> Self {
        Self {
            roles: Role::ALL.into_iter().map(|role| (role, BTreeSet::new())).collect(),
        }
    }

    /// Adds `users` under `role`.
    #[must_use]
    pub fn assign<I, S>(mut self, role: Role, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.roles.entry(role).or_default();
        entry.extend(users.into_iter().map(Into::into));
        self
    }

    /// Adds `users` under the role called `name`.
    pub fn assign_named<I, S>(self, name: &str, users: I) -> AclResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let role: Role = name.parse()?;
        Ok(self.assign(role, users))
    }

    /// Adds one user under `role`.
    pub fn insert(&mut self, role: Role, user: impl Into<String>) {
        self.roles.entry(role).or_default().insert(user.into());
    }

    /// Removes `user` from `role`. Returns whether it was there.
    pub fn remove(&mut self, role: Role, user: &str) -> bool {
        self.roles
            .get_mut(&role)
            .is_some_and(|users| users.remove(user))
    }

    /// Returns whether `user` is listed under `role`.
    #[must_use]
    pub fn contains(&self, role: Role, user: &str) -> bool {
        self.roles.get(&role).is_some_and(|users| users.contains(user))
    }

    /// Users under `role`, sorted.
    pub fn users(&self, role: Role) -> impl Iterator<Item = &str> {
        self.roles
            .get(&role)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Roles with their users, in [`Role::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &BTreeSet<String>)> {
        self.roles.iter().map(|(role, users)| (*role, users))
    }

    /// Every user under any role.
    #[must_use]
    pub fn all_users(&self) -> BTreeSet<&str> {
        self.roles.values().flatten().map(String::as_str).collect()
    }

    /// Returns `true` when no role lists any user.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.values().all(BTreeSet::is_empty)
    }

    /// Checks that no user is listed under more than one role.
    pub fn validate(&self) -> AclResult<()> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for user in self.roles.values().flatten() {
            *seen.entry(user.as_str()).or_default() += 1;
        }
        let users: Vec<String> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(user, _)| user.to_owned())
            .collect();

        if users.is_empty() {
            Ok(())
        } else {
            Err(AclError::AmbiguousRoleAssignment { users })
        }
    }
}
