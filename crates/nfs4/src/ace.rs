//! crates/nfs4/src/ace.rs
//!
//! NFSv4 ACE model and its `nfs4_getfacl` text representation.

use std::fmt;
use std::str::FromStr;

use permissions::PermissionSet;

use crate::error::Nfs4Error;

/// NFSv4 ACE type values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AceType {
    /// Access allowed (`A`).
    Allow,
    /// Access denied (`D`).
    Deny,
    /// Audit, log access attempts (`U`).
    Audit,
    /// Alarm, trigger alarm on access (`L`).
    Alarm,
}

impl AceType {
    /// Returns the type letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Allow => 'A',
            Self::Deny => 'D',
            Self::Audit => 'U',
            Self::Alarm => 'L',
        }
    }
}

impl TryFrom<&str> for AceType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "A" => Ok(Self::Allow),
            "D" => Ok(Self::Deny),
            "U" => Ok(Self::Audit),
            "L" => Ok(Self::Alarm),
            other => Err(format!("invalid ACE type \"{other}\"")),
        }
    }
}

/// NFSv4 ACE flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AceFlags(u8);

impl AceFlags {
    /// ACE applies to files in this directory (`f`).
    pub const FILE_INHERIT: u8 = 0x01;
    /// ACE applies to subdirectories (`d`).
    pub const DIRECTORY_INHERIT: u8 = 0x02;
    /// Don't propagate inheritance to children of children (`n`).
    pub const NO_PROPAGATE_INHERIT: u8 = 0x04;
    /// ACE is for inheritance only, doesn't apply to this object (`i`).
    pub const INHERIT_ONLY: u8 = 0x08;
    /// Audit successful accesses (`S`).
    pub const SUCCESSFUL_ACCESS: u8 = 0x10;
    /// Audit failed accesses (`F`).
    pub const FAILED_ACCESS: u8 = 0x20;
    /// Principal is a group (`g`).
    pub const IDENTIFIER_GROUP: u8 = 0x40;
    /// ACE was inherited from parent (`O`).
    pub const INHERITED: u8 = 0x80;

    /// File and directory inheritance together (`fd`).
    pub const INHERIT: u8 = Self::FILE_INHERIT | Self::DIRECTORY_INHERIT;

    const LETTERS: [(u8, char); 8] = [
        (Self::FILE_INHERIT, 'f'),
        (Self::DIRECTORY_INHERIT, 'd'),
        (Self::NO_PROPAGATE_INHERIT, 'n'),
        (Self::INHERIT_ONLY, 'i'),
        (Self::SUCCESSFUL_ACCESS, 'S'),
        (Self::FAILED_ACCESS, 'F'),
        (Self::IDENTIFIER_GROUP, 'g'),
        (Self::INHERITED, 'O'),
    ];

    /// Creates flags from raw value.
    #[must_use]
    pub const fn from_raw(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw flags value.
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        self.0
    }

    /// Checks if every bit of `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: u8) -> bool {
        (self.0 & flag) == flag
    }

    /// Returns a copy with `flag` set.
    #[must_use]
    pub const fn with(self, flag: u8) -> Self {
        Self(self.0 | flag)
    }

    /// Returns a copy with `flag` cleared.
    #[must_use]
    pub const fn without(self, flag: u8) -> Self {
        Self(self.0 & !flag)
    }

    /// Parses flag letters such as `fdg`.
    pub fn from_letters(letters: &str) -> Result<Self, String> {
        let mut raw = 0;
        for letter in letters.chars() {
            let (bit, _) = Self::LETTERS
                .iter()
                .find(|(_, l)| *l == letter)
                .ok_or_else(|| format!("invalid ACE flag '{letter}'"))?;
            raw |= bit;
        }
        Ok(Self(raw))
    }
}

impl fmt::Display for AceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bit, letter) in Self::LETTERS {
            if self.0 & bit != 0 {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// Principals with a fixed meaning in every ACL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialPrincipal {
    /// The file owner.
    Owner,
    /// The owning group.
    Group,
    /// Everybody else.
    Everyone,
}

impl SpecialPrincipal {
    /// Every special principal.
    pub const ALL: [Self; 3] = [Self::Group, Self::Owner, Self::Everyone];

    /// Name as written before the `@`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Group => "GROUP",
            Self::Everyone => "EVERYONE",
        }
    }
}

/// The `who` field of an ACE.
///
/// The text is kept exactly as read so that writing an ACL back reproduces
/// principals byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    name: String,
    domain: Option<String>,
}

impl Principal {
    /// A user principal, `name@domain`.
    #[must_use]
    pub fn user(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: Some(domain.into()),
        }
    }

    /// A special principal, rendered `OWNER@`, `GROUP@` or `EVERYONE@`.
    #[must_use]
    pub fn special(kind: SpecialPrincipal) -> Self {
        Self {
            name: kind.as_str().to_owned(),
            domain: Some(String::new()),
        }
    }

    /// The part before `@`, i.e. the user name for user principals.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The part after `@`, if the principal has one.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Classifies the principal as special by its name, whatever the domain.
    #[must_use]
    pub fn special_kind(&self) -> Option<SpecialPrincipal> {
        SpecialPrincipal::ALL
            .into_iter()
            .find(|kind| kind.as_str() == self.name)
    }

    /// Returns `true` for `OWNER`, `GROUP` and `EVERYONE`.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.special_kind().is_some()
    }
}

impl FromStr for Principal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, domain) = match s.split_once('@') {
            Some((name, domain)) => (name, Some(domain.to_owned())),
            None => (s, None),
        };
        if name.is_empty() {
            return Err("empty principal".to_owned());
        }
        Ok(Self {
            name: name.to_owned(),
            domain,
        })
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(domain) = &self.domain {
            write!(f, "@{domain}")?;
        }
        Ok(())
    }
}

/// A single NFSv4 Access Control Entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ace {
    /// Type of ACE (allow/deny/audit/alarm).
    pub ace_type: AceType,
    /// ACE flags (inheritance, etc.).
    pub flags: AceFlags,
    /// Principal identifier (user/group name or special identifier).
    pub principal: Principal,
    /// Access mask (permissions).
    pub mask: PermissionSet,
}

impl Ace {
    /// Creates an ACE.
    #[must_use]
    pub const fn new(
        ace_type: AceType,
        flags: AceFlags,
        principal: Principal,
        mask: PermissionSet,
    ) -> Self {
        Self {
            ace_type,
            flags,
            principal,
            mask,
        }
    }
}

impl FromStr for Ace {
    type Err = Nfs4Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim().split(':').collect();
        let [ace_type, flags, principal, mask] = fields.as_slice() else {
            return Err(Nfs4Error::malformed(
                line,
                format!("expected 4 ':'-separated fields, found {}", fields.len()),
            ));
        };

        let ace_type = AceType::try_from(*ace_type).map_err(|r| Nfs4Error::malformed(line, r))?;
        let flags = AceFlags::from_letters(flags).map_err(|r| Nfs4Error::malformed(line, r))?;
        let principal = principal
            .parse()
            .map_err(|r: String| Nfs4Error::malformed(line, r))?;
        let mask = PermissionSet::from_letters(mask)
            .map_err(|e| Nfs4Error::malformed(line, e.to_string()))?;

        Ok(Self::new(ace_type, flags, principal, mask))
    }
}

impl fmt::Display for Ace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.ace_type.letter(),
            self.flags,
            self.principal,
            self.mask
        )
    }
}

/// An NFSv4 Access Control List.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nfs4Acl {
    /// The list of ACEs in evaluation order.
    pub aces: Vec<Ace>,
}

impl Nfs4Acl {
    /// Creates an empty ACL.
    #[must_use]
    pub const fn new() -> Self {
        Self { aces: Vec::new() }
    }

    /// Parses `nfs4_getfacl` output, one ACE per line.
    ///
    /// Blank lines and `#` comment lines are skipped.
    pub fn parse(text: &str) -> Result<Self, Nfs4Error> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::parse)
            .collect()
    }

    /// Renders the ACL as the single comma-separated argument `nfs4_setfacl`
    /// expects.
    #[must_use]
    pub fn to_spec(&self) -> String {
        self.aces
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Returns true if the ACL is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.aces.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.aces.len()
    }

    /// Iterates over the entries in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Ace> {
        self.aces.iter()
    }
}

impl FromIterator<Ace> for Nfs4Acl {
    fn from_iter<I: IntoIterator<Item = Ace>>(iter: I) -> Self {
        Self {
            aces: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Nfs4Acl {
    type Item = Ace;
    type IntoIter = std::vec::IntoIter<Ace>;

    fn into_iter(self) -> Self::IntoIter {
        self.aces.into_iter()
    }
}

impl<'a> IntoIterator for &'a Nfs4Acl {
    type Item = &'a Ace;
    type IntoIter = std::slice::Iter<'a, Ace>;

    fn into_iter(self) -> Self::IntoIter {
        self.aces.iter()
    }
}

impl fmt::Display for Nfs4Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ace in &self.aces {
            writeln!(f, "{ace}")?;
        }
        Ok(())
    }
}
