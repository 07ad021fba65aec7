//! crates/permissions/src/inference.rs
//!
//! Nearest-role inference for raw permission masks.
//!
//! `nfs4_getfacl` reports masks, not role labels. To tell which role an
//! existing ACE represents, every role's allow set is compared against the
//! observed mask and the role with the fewest differing letters wins.

use crate::permission::PermissionSet;
use crate::role::{Role, permissions_for};

/// Distance between an observed mask and one role's allow set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDistance {
    /// The candidate role.
    pub role: Role,
    /// Letters present in exactly one of the observed mask and the role's
    /// allow set.
    pub difference: PermissionSet,
}

impl RoleDistance {
    /// Size of the symmetric difference.
    #[must_use]
    pub const fn distance(&self) -> u32 {
        self.difference.len()
    }
}

/// Computes the distance from `observed` to every role, in [`Role::ALL`] order.
#[must_use]
pub fn role_distances(observed: PermissionSet) -> [RoleDistance; 4] {
    Role::ALL.map(|role| RoleDistance {
        role,
        difference: observed.symmetric_difference(permissions_for(role).allow),
    })
}

/// Returns the role whose allow set is closest to `observed`.
///
/// Ties go to the role listed first in [`Role::ALL`], i.e. the more
/// privileged one.
#[must_use]
pub fn infer_role(observed: PermissionSet) -> Role {
    let distances = role_distances(observed);
    let mut best = distances[0];
    for candidate in &distances[1..] {
        // strict comparison keeps the earlier role on ties
        if candidate.distance() < best.distance() {
            best = *candidate;
        }
    }
    best.role
}
