//! crates/logging/src/tracing_macros.rs
//! Convenience macros for prjacl-specific tracing.
//!
//! These macros wrap the standard tracing macros with the subsystem targets
//! from [`crate::targets`]. They emit at debug level; warnings and errors use
//! `tracing::warn!`/`tracing::error!` with an explicit target.

/// Emit an ACE-level trace.
///
/// # Example
/// ```ignore
/// trace_acl!("new ACE: {}", ace);
/// ```
#[macro_export]
macro_rules! trace_acl {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "prjacl::acl", $($arg)*);
    };
}

/// Emit a role inference trace.
///
/// # Example
/// ```ignore
/// trace_role!("user {} has role {}", user, role);
/// ```
#[macro_export]
macro_rules! trace_role {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "prjacl::role", $($arg)*);
    };
}

/// Emit a mutation lock trace.
///
/// # Example
/// ```ignore
/// trace_lock!("acquired {}", marker.display());
/// ```
#[macro_export]
macro_rules! trace_lock {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "prjacl::lock", $($arg)*);
    };
}

/// Emit a directory traversal trace.
///
/// # Example
/// ```ignore
/// trace_walk!("entering directory: {:?}", path);
/// ```
#[macro_export]
macro_rules! trace_walk {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "prjacl::walk", $($arg)*);
    };
}

/// Emit an external command trace.
///
/// # Example
/// ```ignore
/// trace_cmd!("running {:?}", command);
/// ```
#[macro_export]
macro_rules! trace_cmd {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "prjacl::cmd", $($arg)*);
    };
}
