#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Role-based management of NFSv4 ACLs on project directories.
//!
//! A project grants four coarse roles: admin, contributor, user and
//! traverse. Storage only knows raw ACEs, so [`ProjectAcl`] translates in
//! both directions:
//!
//! - [`ProjectAcl::get_roles`] infers each user's role from the masks of
//!   their allow entries.
//! - [`ProjectAcl::set_roles`] reconciles a requested [`RoleAssignment`]
//!   against the current ACL and writes the result.
//! - [`ProjectAcl::delete_users`] strips users from a whole project.
//!
//! # Design
//!
//! ACLs are read fresh for every call and the new list is composed in
//! memory. It is either submitted whole, in one `nfs4_setfacl` call, or not
//! at all. Each write happens inside [`guard::with_lock`], so concurrent
//! mutations of one project fail fast with [`AclError::LockHeld`] instead of
//! interleaving.
//!
//! Before a role list is written it passes through [`curate`], which makes
//! entries for `OWNER@`, `GROUP@` and `EVERYONE@` inheritable and drops
//! entries of users that no longer have an account.
//!
//! # Invariants
//!
//! - Validation failures ([`AclError::InvalidRole`], [`AclError::InvalidMask`],
//!   [`AclError::AmbiguousRoleAssignment`]) happen before any I/O.
//! - Newly assigned entries precede every retained entry.
//! - The lock marker is gone when a mutating call returns, whatever the
//!   outcome.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//!
//! use guard::CallerContext;
//! use permissions::Role;
//! use reconcile::{MutationOutcome, ProjectAcl, RoleAssignment};
//! use test_support::{MemoryBackend, StaticAccounts};
//!
//! let root = tempfile::tempdir().unwrap();
//! let backend = MemoryBackend::new();
//! let project = ProjectAcl::new(
//!     root.path(),
//!     &backend,
//!     StaticAccounts::new(["alice", "bob"]),
//!     CallerContext::new("alice", "mentat001"),
//! );
//!
//! let request = RoleAssignment::new()
//!     .assign(Role::Admin, ["alice"])
//!     .assign(Role::User, ["bob"]);
//! let outcome = project.set_roles(Path::new(""), &request, true, false).unwrap();
//! assert!(outcome.is_applied());
//!
//! let report = project.get_roles(Path::new(""), false);
//! let (_, roles) = report.successes().next().unwrap();
//! assert!(roles.contains(Role::User, "bob"));
//! ```

mod assignment;
mod config;
mod curate;
mod error;
mod project;
mod report;

pub use assignment::RoleAssignment;
pub use config::{AclConfig, DEFAULT_DOMAIN};
pub use curate::curate;
pub use error::{AclError, AclResult};
pub use project::{DEFAULT_DELETE_ROLES, ProjectAcl};
pub use report::{MutationOutcome, PathRoles, RolesReport};
