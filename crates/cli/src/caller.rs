//! crates/cli/src/caller.rs
//!
//! Identity of the invoking user, recorded in lock markers.

use guard::CallerContext;
#[cfg(unix)]
use logging::targets;

const UNKNOWN: &str = "unknown";

/// Builds the caller context from the current user and host names.
#[cfg(unix)]
pub fn caller_context() -> CallerContext {
    let identity = uzers::get_current_username()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| {
            tracing::warn!(target: targets::LOCK, "cannot resolve the current user name");
            UNKNOWN.to_owned()
        });
    let host = nix::unistd::gethostname()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|err| {
            tracing::warn!(target: targets::LOCK, "cannot resolve the host name: {err}");
            UNKNOWN.to_owned()
        });
    CallerContext::new(identity, host)
}

/// Builds the caller context; names are unknown off Unix.
#[cfg(not(unix))]
pub fn caller_context() -> CallerContext {
    CallerContext::new(UNKNOWN, UNKNOWN)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn caller_matches_current_uid() {
        let caller = caller_context();
        let expected = uzers::get_user_by_uid(uzers::get_current_uid())
            .map(|user| user.name().to_string_lossy().into_owned());
        if let Some(expected) = expected {
            assert_eq!(caller.identity, expected);
        }
        assert!(!caller.host.is_empty());
    }
}
