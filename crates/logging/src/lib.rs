#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` owns the diagnostic plumbing shared by the prjacl workspace. All
//! crates emit events through the [`tracing`] macros; this crate decides which
//! of them reach the terminal and how they look.
//!
//! # Design
//!
//! - [`LogLevel`] maps the numeric `-l/--loglevel` verbosity of the command
//!   line onto a [`tracing`] level filter.
//! - [`init_tracing`] installs a [`tracing_subscriber`] registry with an
//!   [`EnvFilter`](tracing_subscriber::EnvFilter) and the bracketed
//!   [`BracketFormat`] event formatter on standard error.
//! - [`targets`] names one tracing target per subsystem; the `trace_*!`
//!   macros emit debug-level events on those targets.
//!
//! # Examples
//!
//! ```
//! use logging::LogLevel;
//! use tracing::level_filters::LevelFilter;
//!
//! let level = LogLevel::from_verbosity(2).unwrap();
//! assert_eq!(level.filter(), LevelFilter::INFO);
//! ```

mod format;
mod level;
mod subscriber;
mod tracing_macros;

pub use format::BracketFormat;
pub use level::{LevelError, LogLevel};
pub use subscriber::{ENV_VAR, build_filter, init_tracing};

/// Tracing targets used across the workspace.
pub mod targets {
    /// ACE reading, composition and application.
    pub const ACL: &str = "prjacl::acl";
    /// Role expansion and inference.
    pub const ROLE: &str = "prjacl::role";
    /// Mutation lock acquisition and release.
    pub const LOCK: &str = "prjacl::lock";
    /// Directory traversal.
    pub const WALK: &str = "prjacl::walk";
    /// External tool invocation.
    pub const CMD: &str = "prjacl::cmd";
}
