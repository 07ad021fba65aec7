//! crates/permissions/src/role.rs
//!
//! Project roles and their expansion into allow/deny masks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PermissionError;
use crate::permission::Alias::{Execute as X, Read as R, Write as W};
use crate::permission::Permission::{
    AppendData, Delete, DeleteChild, Execute, ReadAcl, ReadAttributes, ReadData, ReadNamedAttrs,
    Synchronize, WriteAttributes, WriteData, WriteNamedAttrs, WriteOwner,
};
use crate::permission::{Alias, Permission, PermissionSet};

/// A symbol in a role's base definition: an alias or a plain permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// Composite symbol expanded through [`Alias::expansion`].
    Alias(Alias),
    /// A single permission bit.
    Bit(Permission),
}

impl Symbol {
    /// Returns the letter the symbol is written as.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Alias(alias) => alias.letter(),
            Self::Bit(permission) => permission.letter(),
        }
    }

    const fn expansion(self) -> PermissionSet {
        match self {
            Self::Alias(alias) => alias.expansion(),
            Self::Bit(permission) => PermissionSet::single(permission),
        }
    }
}

/// `RXWdDoy`
const ADMIN: &[Symbol] = &[
    Symbol::Alias(R),
    Symbol::Alias(X),
    Symbol::Alias(W),
    Symbol::Bit(Delete),
    Symbol::Bit(DeleteChild),
    Symbol::Bit(WriteOwner),
    Symbol::Bit(Synchronize),
];

/// `rwaDdxnNtTcy`
const CONTRIBUTOR: &[Symbol] = &[
    Symbol::Bit(ReadData),
    Symbol::Bit(WriteData),
    Symbol::Bit(AppendData),
    Symbol::Bit(DeleteChild),
    Symbol::Bit(Delete),
    Symbol::Bit(Execute),
    Symbol::Bit(ReadNamedAttrs),
    Symbol::Bit(WriteNamedAttrs),
    Symbol::Bit(ReadAttributes),
    Symbol::Bit(WriteAttributes),
    Symbol::Bit(ReadAcl),
    Symbol::Bit(Synchronize),
];

/// `RXy`
const USER: &[Symbol] = &[Symbol::Alias(R), Symbol::Alias(X), Symbol::Bit(Synchronize)];

/// `x`
const TRAVERSE: &[Symbol] = &[Symbol::Bit(Execute)];

/// Access role a user can hold on a project.
///
/// Declaration order is the priority order used to break ties during
/// inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full control including ACL and ownership changes.
    Admin,
    /// Read/write access to data, no ACL or ownership changes.
    Contributor,
    /// Read-only access.
    User,
    /// Directory traversal only.
    Traverse,
}

impl Role {
    /// Every role, in priority order.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Contributor, Self::User, Self::Traverse];

    /// Lower-case role name as used on the command line and in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Contributor => "contributor",
            Self::User => "user",
            Self::Traverse => "traverse",
        }
    }

    /// Symbols making up the role's allow mask before alias expansion.
    #[must_use]
    pub const fn base(self) -> &'static [Symbol] {
        match self {
            Self::Admin => ADMIN,
            Self::Contributor => CONTRIBUTOR,
            Self::User => USER,
            Self::Traverse => TRAVERSE,
        }
    }

    /// The role's base definition written as letters, e.g. `RXy`.
    #[must_use]
    pub fn base_letters(self) -> String {
        self.base().iter().map(|symbol| symbol.letter()).collect()
    }

    /// Position of the role in [`Role::ALL`].
    #[must_use]
    pub const fn priority(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PermissionError::InvalidRole(trimmed.to_owned()))
    }
}

/// Allow and deny masks for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMask {
    /// Permissions granted by the role.
    pub allow: PermissionSet,
    /// Everything else in the alphabet.
    pub deny: PermissionSet,
}

/// Expands `role` into its allow mask and the complementary deny mask.
#[must_use]
pub fn permissions_for(role: Role) -> RoleMask {
    let allow = role
        .base()
        .iter()
        .fold(PermissionSet::EMPTY, |set, symbol| set | symbol.expansion());
    RoleMask {
        allow,
        deny: allow.complement(),
    }
}

/// Looks up a role by name and expands it.
pub fn permissions_for_name(name: &str) -> Result<RoleMask, PermissionError> {
    name.parse().map(permissions_for)
}
