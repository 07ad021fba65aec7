//! crates/guard/src/error.rs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for guard operations.
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors raised while taking, releasing or inspecting a project lock.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Another mutation holds the project lock.
    #[error("cannot set ACL as lock file '{}' has been acquired by another process", marker.display())]
    LockHeld {
        /// Path of the marker file.
        marker: PathBuf,
    },
    /// The marker could not be created, written, read or removed.
    #[error("lock file '{}': {source}", marker.display())]
    Io {
        /// Path of the marker file.
        marker: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The lock record could not be serialised or parsed.
    #[error("lock record '{}': {source}", marker.display())]
    Record {
        /// Path of the marker file.
        marker: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The current time could not be rendered.
    #[error("cannot format lock timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl GuardError {
    pub(crate) fn io(marker: &std::path::Path, source: io::Error) -> Self {
        Self::Io {
            marker: marker.to_path_buf(),
            source,
        }
    }

    /// Returns `true` for [`GuardError::LockHeld`].
    #[must_use]
    pub const fn is_lock_held(&self) -> bool {
        matches!(self, Self::LockHeld { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_held_names_marker() {
        let err = GuardError::LockHeld {
            marker: PathBuf::from("/project/3010000.01/.setacl_lock"),
        };
        assert!(err.is_lock_held());
        assert!(
            err.to_string()
                .contains("'/project/3010000.01/.setacl_lock' has been acquired")
        );
    }

    #[test]
    fn io_error_is_not_lock_held() {
        let err = GuardError::io(
            std::path::Path::new("/p/.setacl_lock"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_lock_held());
        assert_eq!(err.to_string(), "lock file '/p/.setacl_lock': denied");
    }
}
