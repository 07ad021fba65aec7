//! crates/permissions/src/error.rs
//!
//! Error types for permission parsing and role lookup.

use thiserror::Error;

/// Result type for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;

/// Errors raised while interpreting permission letters or role names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// A mask contained a letter outside the NFSv4 permission alphabet.
    #[error("unknown permission letter '{letter}' in mask \"{mask}\"")]
    UnknownPermission {
        /// Offending letter.
        letter: char,
        /// Mask the letter was found in.
        mask: String,
    },
    /// The requested role is not one of the supported roles.
    #[error("no such role: {0}")]
    InvalidRole(String),
}
