//! crates/reconcile/src/report.rs
//!
//! Results handed back by [`crate::ProjectAcl`].

use std::path::PathBuf;

use nfs4::Nfs4Acl;

use crate::assignment::RoleAssignment;
use crate::error::AclError;

/// Roles found on one path, or why they could not be determined.
#[derive(Debug)]
pub struct PathRoles {
    /// The path reported on.
    pub path: PathBuf,
    /// Users per role; every role is present.
    pub outcome: Result<RoleAssignment, AclError>,
}

/// Per-path results of [`crate::ProjectAcl::get_roles`].
#[derive(Debug, Default)]
pub struct RolesReport {
    /// One element per visited path, in traversal order.
    pub paths: Vec<PathRoles>,
}

impl RolesReport {
    /// Paths whose roles were determined.
    pub fn successes(&self) -> impl Iterator<Item = (&PathBuf, &RoleAssignment)> {
        self.paths
            .iter()
            .filter_map(|entry| entry.outcome.as_ref().ok().map(|roles| (&entry.path, roles)))
    }

    /// Paths that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &AclError)> {
        self.paths
            .iter()
            .filter_map(|entry| entry.outcome.as_ref().err().map(|err| (&entry.path, err)))
    }

    /// Returns `true` when at least one path failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// What a mutating call did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The ACL was written.
    Applied {
        /// Path written to.
        path: PathBuf,
        /// The entries handed to `nfs4_setfacl`.
        acl: Nfs4Acl,
    },
    /// The request was already satisfied; nothing was written.
    NothingToDo,
}

impl MutationOutcome {
    /// Returns `true` when the ACL was written.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}
