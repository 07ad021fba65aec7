//! crates/nfs4/src/backend.rs
//!
//! The read/write seam between ACL logic and the storage that holds ACLs.

use std::path::Path;

use crate::ace::Nfs4Acl;
use crate::error::Nfs4Result;

/// How a write combines the given entries with the existing ACL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Replace the whole ACL (`-s`).
    #[default]
    Replace,
    /// Add the entries to the ACL (`-a`).
    Append,
    /// Remove matching entries from the ACL (`-x`).
    Remove,
}

impl WriteMode {
    /// The `nfs4_setfacl` option selecting this mode.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Replace => "-s",
            Self::Append => "-a",
            Self::Remove => "-x",
        }
    }
}

/// Options for [`AclBackend::write_acl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Apply to every file and directory below the path as well.
    pub recursive: bool,
    /// How the entries are combined with what is there.
    pub mode: WriteMode,
}

impl WriteOptions {
    /// Recursive write in `mode`.
    #[must_use]
    pub const fn recursive(mode: WriteMode) -> Self {
        Self {
            recursive: true,
            mode,
        }
    }

    /// Write on the path only.
    #[must_use]
    pub const fn single(mode: WriteMode) -> Self {
        Self {
            recursive: false,
            mode,
        }
    }
}

/// Reads and writes NFSv4 ACLs.
pub trait AclBackend {
    /// Returns the ACL of `path`.
    fn read_acl(&self, path: &Path) -> Nfs4Result<Nfs4Acl>;

    /// Applies `acl` to `path` according to `options`.
    fn write_acl(&self, path: &Path, acl: &Nfs4Acl, options: WriteOptions) -> Nfs4Result<()>;
}

impl<T: AclBackend + ?Sized> AclBackend for &T {
    fn read_acl(&self, path: &Path) -> Nfs4Result<Nfs4Acl> {
        (**self).read_acl(path)
    }

    fn write_acl(&self, path: &Path, acl: &Nfs4Acl, options: WriteOptions) -> Nfs4Result<()> {
        (**self).write_acl(path, acl, options)
    }
}
