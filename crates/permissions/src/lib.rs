#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `permissions` encodes the fixed role model used on project storage. Four
//! coarse [`Role`] values (administrator, contributor, read-only user and
//! traverse-only) are expanded into NFSv4 allow/deny permission masks, and
//! arbitrary masks observed on disk can be mapped back to the closest role.
//!
//! # Design
//!
//! - [`Permission`] enumerates the 14 NFSv4 access bits, each identified by the
//!   single letter `nfs4_getfacl` prints for it.
//! - [`PermissionSet`] is a fixed-size bit-set over [`Permission`]. Set algebra
//!   (union, complement, symmetric difference) is exact and allocation free.
//! - [`Role::base`] lists the role's permission letters, where the composite
//!   aliases `R`, `W` and `X` stand for fixed subsets of the alphabet.
//! - [`permissions_for`] expands a role into a [`RoleMask`];
//!   [`infer_role`] ranks every role by the size of the symmetric difference
//!   between its allow set and an observed mask.
//!
//! # Invariants
//!
//! - For every role, `allow ∪ deny` is the full alphabet and `allow ∩ deny` is
//!   empty.
//! - `infer_role(permissions_for(role).allow) == role` for every role.
//! - Ties in [`infer_role`] resolve by [`Role::ALL`] order
//!   (Admin, Contributor, User, Traverse), independent of any map ordering.
//!
//! # Examples
//!
//! ```
//! use permissions::{Role, infer_role, permissions_for};
//!
//! let mask = permissions_for(Role::User);
//! assert_eq!(mask.allow.to_string(), "rxntcy");
//! assert_eq!(infer_role(mask.allow), Role::User);
//! assert!(mask.allow.intersection(mask.deny).is_empty());
//! ```

mod error;
mod inference;
mod permission;
mod role;

pub use error::{PermissionError, PermissionResult};
pub use inference::{RoleDistance, infer_role, role_distances};
pub use permission::{Alias, Permission, PermissionSet};
pub use role::{Role, RoleMask, Symbol, permissions_for, permissions_for_name};
