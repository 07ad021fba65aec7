//! crates/cli/src/exit.rs
//!
//! Process exit statuses.

/// Everything requested was done, or there was nothing to do.
pub const SUCCESS: i32 = 0;
/// The command line, the settings or the role request is invalid.
pub const USAGE: i32 = 1;
/// At least one path or project failed.
pub const FAILURE: i32 = 2;
/// A project was locked by another mutation.
pub const LOCK_HELD: i32 = 3;
