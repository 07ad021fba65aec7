use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Traversal failure, tied to the path it happened on.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The starting path does not exist or cannot be resolved.
    #[error("cannot access '{}': {source}", path.display())]
    Root {
        /// Path the walk was asked to start from.
        path: PathBuf,
        /// Error from the operating system.
        #[source]
        source: io::Error,
    },
    /// A directory was yielded but its contents could not be listed.
    #[error("cannot list directory '{}': {source}", path.display())]
    ReadDir {
        /// The unlistable directory.
        path: PathBuf,
        /// Error from the operating system.
        #[source]
        source: io::Error,
    },
    /// One name of a directory listing could not be read.
    #[error("cannot read an entry of '{}': {source}", path.display())]
    ReadDirEntry {
        /// Directory being listed.
        path: PathBuf,
        /// Error from the operating system.
        #[source]
        source: io::Error,
    },
    /// A listed entry vanished or could not be stat'ed.
    #[error("cannot stat '{}': {source}", path.display())]
    Stat {
        /// The entry that could not be stat'ed.
        path: PathBuf,
        /// Error from the operating system.
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// Path the failure is reported against.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Root { path, .. }
            | Self::ReadDir { path, .. }
            | Self::ReadDirEntry { path, .. }
            | Self::Stat { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn read_dir_display_and_source() {
        let error = WalkError::ReadDir {
            path: PathBuf::from("/project/1/private"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            error.to_string(),
            "cannot list directory '/project/1/private': denied"
        );
        assert_eq!(error.path(), Path::new("/project/1/private"));
        assert!(error.source().is_some());
    }

    #[test]
    fn path_is_reported_for_every_kind() {
        let make = |message: &str| io::Error::other(message.to_owned());
        let errors = [
            WalkError::Root {
                path: PathBuf::from("/a"),
                source: make("x"),
            },
            WalkError::ReadDirEntry {
                path: PathBuf::from("/a"),
                source: make("x"),
            },
            WalkError::Stat {
                path: PathBuf::from("/a"),
                source: make("x"),
            },
        ];
        for error in errors {
            assert_eq!(error.path(), Path::new("/a"));
        }
    }
}
