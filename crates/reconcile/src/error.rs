//! crates/reconcile/src/error.rs

use std::path::PathBuf;

use guard::GuardError;
use nfs4::Nfs4Error;
use thiserror::Error;
use walk::WalkError;

/// Result alias for reconciler operations.
pub type AclResult<T> = Result<T, AclError>;

/// Failures of role reporting and ACL mutation.
#[derive(Debug, Error)]
pub enum AclError {
    /// A role name is not one of the supported roles.
    #[error("no such role: {0}")]
    InvalidRole(String),

    /// A permission mask contained a letter outside the NFSv4 alphabet.
    #[error("invalid permission mask: {source}")]
    InvalidMask {
        /// Parse failure naming the letter and the mask.
        #[source]
        source: permissions::PermissionError,
    },

    /// Users were assigned more than one role in a single request.
    #[error("user(s) present in multiple roles: {}", users.join(", "))]
    AmbiguousRoleAssignment {
        /// Offending users, sorted.
        users: Vec<String>,
    },

    /// The ACL of a path could not be read or parsed.
    #[error("cannot get ACL of '{}': {source}", path.display())]
    AclReadFailed {
        /// Path whose ACL was requested.
        path: PathBuf,
        /// Adapter failure.
        #[source]
        source: Nfs4Error,
    },

    /// A directory below a recursively reported path could not be listed.
    #[error("cannot list file: {}", source.path().display())]
    ListFailed {
        /// Traversal failure.
        #[source]
        source: WalkError,
    },

    /// Another mutation holds the project lock.
    #[error("cannot set ACL as lock file '{}' has been acquired by another process", marker.display())]
    LockHeld {
        /// Path of the marker file.
        marker: PathBuf,
    },

    /// `nfs4_setfacl` failed. The lock has been released.
    #[error("cannot set ACL of '{}': {source}", path.display())]
    AclWriteFailed {
        /// Path the ACL was applied to.
        path: PathBuf,
        /// Adapter failure.
        #[source]
        source: Nfs4Error,
    },

    /// The lock marker could not be created, written or removed.
    #[error(transparent)]
    Lock {
        /// Guard failure.
        source: GuardError,
    },
}

impl AclError {
    /// Returns `true` for [`AclError::LockHeld`].
    #[must_use]
    pub const fn is_lock_held(&self) -> bool {
        matches!(self, Self::LockHeld { .. })
    }

    /// Returns `true` for failures detected before any I/O.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRole(_)
                | Self::InvalidMask { .. }
                | Self::AmbiguousRoleAssignment { .. }
        )
    }
}

impl From<GuardError> for AclError {
    fn from(error: GuardError) -> Self {
        match error {
            GuardError::LockHeld { marker } => Self::LockHeld { marker },
            source => Self::Lock { source },
        }
    }
}

impl From<permissions::PermissionError> for AclError {
    fn from(error: permissions::PermissionError) -> Self {
        match error {
            permissions::PermissionError::InvalidRole(name) => Self::InvalidRole(name),
            source @ permissions::PermissionError::UnknownPermission { .. } => {
                Self::InvalidMask { source }
            }
        }
    }
}
