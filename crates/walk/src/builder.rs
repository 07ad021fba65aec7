use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::WalkError;
use crate::walker::Walker;

/// Options for a project tree traversal.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    include_root: bool,
    skipped: Vec<OsString>,
}

impl WalkBuilder {
    /// Starts a traversal of `root`, which is yielded first.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            include_root: true,
            skipped: Vec::new(),
        }
    }

    /// Whether `root` itself is yielded before its contents.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Never yields nor descends into entries called `name`, at any depth.
    ///
    /// The root is exempt.
    #[must_use]
    pub fn skip_name<N: Into<OsString>>(mut self, name: N) -> Self {
        self.skipped.push(name.into());
        self
    }

    /// Resolves the root and lists it when it is a directory.
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::new(self.root, self.include_root, self.skipped)
    }
}
