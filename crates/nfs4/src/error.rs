//! crates/nfs4/src/error.rs
//!
//! Error types for ACE parsing and nfs4-acl-tools invocation.

use std::io;

use thiserror::Error;

/// Result type for NFSv4 ACL operations.
pub type Nfs4Result<T> = Result<T, Nfs4Error>;

/// Errors that can occur while parsing or applying NFSv4 ACLs.
#[derive(Debug, Error)]
pub enum Nfs4Error {
    /// A line of `nfs4_getfacl` output could not be parsed.
    #[error("malformed ACE \"{line}\": {reason}")]
    MalformedAce {
        /// The offending text.
        line: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The external program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name or path.
        program: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The external program ran but reported failure.
    #[error("{command} failed ({status}): {stderr}")]
    ToolFailed {
        /// Rendered command line.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

impl Nfs4Error {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        Self::MalformedAce {
            line: line.to_owned(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn malformed_ace_mentions_line_and_reason() {
        let err = Nfs4Error::malformed("A:fd", "expected 4 fields");
        let text = err.to_string();
        assert!(text.contains("A:fd"));
        assert!(text.contains("expected 4 fields"));
    }

    #[test]
    fn spawn_error_exposes_source() {
        let err = Nfs4Error::Spawn {
            program: "nfs4_getfacl".to_owned(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to run nfs4_getfacl"));
    }

    #[test]
    fn tool_failure_display() {
        let err = Nfs4Error::ToolFailed {
            command: "nfs4_setfacl -R -s A::OWNER@:rwx /p/".to_owned(),
            status: "exit status: 255".to_owned(),
            stderr: "Operation not permitted".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "nfs4_setfacl -R -s A::OWNER@:rwx /p/ failed (exit status: 255): Operation not permitted"
        );
    }
}
