//! crates/permissions/src/permission.rs
//!
//! The NFSv4 permission alphabet and a bit-set over it.
//!
//! `nfs4_getfacl` renders an access mask as a string of letters, one per
//! granted bit. The letters are opaque symbols here: only membership matters,
//! never their position or the on-wire bit value.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not, Sub};
use std::str::FromStr;

use crate::error::PermissionError;

/// A single NFSv4 access permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Permission {
    /// Read data from file / list directory (`r`).
    ReadData = 0,
    /// Write data to file / create file in directory (`w`).
    WriteData = 1,
    /// Append data to file / create subdirectory (`a`).
    AppendData = 2,
    /// Delete a file within a directory (`D`).
    DeleteChild = 3,
    /// Delete the file itself (`d`).
    Delete = 4,
    /// Execute file / search directory (`x`).
    Execute = 5,
    /// Read named attributes (`n`).
    ReadNamedAttrs = 6,
    /// Write named attributes (`N`).
    WriteNamedAttrs = 7,
    /// Read file attributes (`t`).
    ReadAttributes = 8,
    /// Write file attributes (`T`).
    WriteAttributes = 9,
    /// Read the ACL (`c`).
    ReadAcl = 10,
    /// Write the ACL (`C`).
    WriteAcl = 11,
    /// Change owner (`o`).
    WriteOwner = 12,
    /// Synchronize (`y`).
    Synchronize = 13,
}

impl Permission {
    /// Every permission, in the canonical `rwaDdxnNtTcCoy` order.
    pub const ALL: [Self; 14] = [
        Self::ReadData,
        Self::WriteData,
        Self::AppendData,
        Self::DeleteChild,
        Self::Delete,
        Self::Execute,
        Self::ReadNamedAttrs,
        Self::WriteNamedAttrs,
        Self::ReadAttributes,
        Self::WriteAttributes,
        Self::ReadAcl,
        Self::WriteAcl,
        Self::WriteOwner,
        Self::Synchronize,
    ];

    /// Returns the letter `nfs4_getfacl` uses for this permission.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::ReadData => 'r',
            Self::WriteData => 'w',
            Self::AppendData => 'a',
            Self::DeleteChild => 'D',
            Self::Delete => 'd',
            Self::Execute => 'x',
            Self::ReadNamedAttrs => 'n',
            Self::WriteNamedAttrs => 'N',
            Self::ReadAttributes => 't',
            Self::WriteAttributes => 'T',
            Self::ReadAcl => 'c',
            Self::WriteAcl => 'C',
            Self::WriteOwner => 'o',
            Self::Synchronize => 'y',
        }
    }

    /// Looks up a permission by its letter.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        Some(match letter {
            'r' => Self::ReadData,
            'w' => Self::WriteData,
            'a' => Self::AppendData,
            'D' => Self::DeleteChild,
            'd' => Self::Delete,
            'x' => Self::Execute,
            'n' => Self::ReadNamedAttrs,
            'N' => Self::WriteNamedAttrs,
            't' => Self::ReadAttributes,
            'T' => Self::WriteAttributes,
            'c' => Self::ReadAcl,
            'C' => Self::WriteAcl,
            'o' => Self::WriteOwner,
            'y' => Self::Synchronize,
            _ => return None,
        })
    }

    const fn bit(self) -> u16 {
        1 << (self as u8)
    }
}

/// Composite symbols accepted in role definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alias {
    /// `R`: generic read.
    Read,
    /// `W`: generic write.
    Write,
    /// `X`: generic execute.
    Execute,
}

impl Alias {
    /// Returns the alias letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Read => 'R',
            Self::Write => 'W',
            Self::Execute => 'X',
        }
    }

    /// Looks up an alias by its letter.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'R' => Some(Self::Read),
            'W' => Some(Self::Write),
            'X' => Some(Self::Execute),
            _ => None,
        }
    }

    /// Returns the permissions the alias stands for.
    #[must_use]
    pub const fn expansion(self) -> PermissionSet {
        use Permission::{
            AppendData, Execute, ReadAcl, ReadAttributes, ReadData, ReadNamedAttrs, Synchronize,
            WriteAcl, WriteAttributes, WriteData, WriteNamedAttrs,
        };

        match self {
            // rntcy
            Self::Read => PermissionSet::from_bits(
                ReadData.bit()
                    | ReadNamedAttrs.bit()
                    | ReadAttributes.bit()
                    | ReadAcl.bit()
                    | Synchronize.bit(),
            ),
            // watTNcCy
            Self::Write => PermissionSet::from_bits(
                WriteData.bit()
                    | AppendData.bit()
                    | ReadAttributes.bit()
                    | WriteAttributes.bit()
                    | WriteNamedAttrs.bit()
                    | ReadAcl.bit()
                    | WriteAcl.bit()
                    | Synchronize.bit(),
            ),
            // xtcy
            Self::Execute => PermissionSet::from_bits(
                Execute.bit() | ReadAttributes.bit() | ReadAcl.bit() | Synchronize.bit(),
            ),
        }
    }
}

/// A set of [`Permission`] values backed by a 14-bit mask.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet(u16);

impl PermissionSet {
    const FULL_BITS: u16 = (1 << Permission::ALL.len()) - 1;

    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// The full permission alphabet.
    pub const FULL: Self = Self(Self::FULL_BITS);

    const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::FULL_BITS)
    }

    /// A set holding exactly `permission`.
    #[must_use]
    pub const fn single(permission: Permission) -> Self {
        Self(permission.bit())
    }

    /// Parses a mask of plain permission letters (no aliases).
    ///
    /// Repeated letters are accepted; order is irrelevant.
    pub fn from_letters(mask: &str) -> Result<Self, PermissionError> {
        mask.chars()
            .map(|letter| {
                Permission::from_letter(letter).ok_or_else(|| PermissionError::UnknownPermission {
                    letter,
                    mask: mask.to_owned(),
                })
            })
            .collect()
    }

    /// Parses a mask that may also contain the `R`, `W` and `X` aliases.
    pub fn expand(spec: &str) -> Result<Self, PermissionError> {
        let mut set = Self::EMPTY;
        for letter in spec.chars() {
            if let Some(alias) = Alias::from_letter(letter) {
                set = set | alias.expansion();
            } else if let Some(permission) = Permission::from_letter(letter) {
                set.insert(permission);
            } else {
                return Err(PermissionError::UnknownPermission {
                    letter,
                    mask: spec.to_owned(),
                });
            }
        }
        Ok(set)
    }

    /// Adds a permission to the set.
    pub fn insert(&mut self, permission: Permission) {
        self.0 |= permission.bit();
    }

    /// Removes a permission from the set.
    pub fn remove(&mut self, permission: Permission) {
        self.0 &= !permission.bit();
    }

    /// Returns a copy of the set without `permission`.
    #[must_use]
    pub const fn without(self, permission: Permission) -> Self {
        Self(self.0 & !permission.bit())
    }

    /// Checks whether `permission` is in the set.
    #[must_use]
    pub const fn contains(self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    /// Set union.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Set intersection.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Elements of `self` that are not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Elements present in exactly one of the two sets.
    #[must_use]
    pub const fn symmetric_difference(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    /// Complement with respect to the full alphabet.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self(!self.0 & Self::FULL_BITS)
    }

    /// Number of permissions in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns `true` when the set holds no permission.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the members in canonical alphabet order.
    pub fn iter(self) -> impl Iterator<Item = Permission> {
        Permission::ALL
            .into_iter()
            .filter(move |permission| self.contains(*permission))
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for permission in iter {
            set.insert(permission);
        }
        set
    }
}

impl FromStr for PermissionSet {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_letters(s)
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for permission in self.iter() {
            write!(f, "{}", permission.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PermissionSet(\"{self}\")")
    }
}

impl BitOr for PermissionSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitAnd for PermissionSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl Sub for PermissionSet {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl Not for PermissionSet {
    type Output = Self;

    fn not(self) -> Self {
        self.complement()
    }
}
