use std::path::{Path, PathBuf};

/// What a yielded path is. Symbolic links and special files never appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory; its contents follow it.
    Directory,
    /// Anything ACL tools treat as a leaf, normally a regular file.
    File,
}

/// One path of the traversal.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub(crate) path: PathBuf,
    pub(crate) relative: PathBuf,
    pub(crate) kind: EntryKind,
    pub(crate) depth: usize,
}

impl WalkEntry {
    /// Absolute path, suitable for handing to the ACL tools.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path below the traversal root; empty for the root.
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Directory or file.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Number of components below the root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// `true` for the traversal root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.depth == 0
    }
}
