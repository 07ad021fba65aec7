#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Per-project mutual exclusion for ACL mutations.
//!
//! A project is locked by the presence of the marker file
//! [`MARKER`] in its root directory. The marker holds a JSON
//! [`LockRecord`] naming the caller, the time and the ACEs about to be
//! applied, so that a crashed or hung `nfs4_setfacl` can be diagnosed
//! afterwards.
//!
//! # Design
//!
//! - [`acquire`] creates the marker with `create_new`, making the
//!   check-and-create a single filesystem operation. A process-wide set of
//!   held roots additionally excludes concurrent callers in one process.
//! - [`LockGuard`] removes the marker when dropped, so the lock is released
//!   whether the mutation succeeds, fails or panics.
//! - [`with_lock`] wraps a mutation closure in acquire and release.
//! - [`inspect`] and [`clear`] are operator tools. A stale marker is reported
//!   by [`inspect`] and only removed by an explicit [`clear`].
//!
//! # Invariants
//!
//! - An existing marker is never modified or removed by [`acquire`].
//! - Every marker created by [`acquire`] is removed by its guard.
//!
//! # Examples
//!
//! ```
//! use guard::{CallerContext, GuardError, with_lock};
//!
//! let root = tempfile::tempdir().unwrap();
//! let caller = CallerContext::new("alice", "mentat001");
//! let aces = vec!["A:fd:bob@dccn.nl:rxy".to_owned()];
//!
//! let applied: Result<usize, GuardError> =
//!     with_lock(root.path(), &caller, &aces, || Ok(aces.len()));
//! assert_eq!(applied.unwrap(), 1);
//! assert!(!root.path().join(guard::MARKER).exists());
//! ```

mod error;
mod inspect;
mod lock;
mod record;

pub use error::{GuardError, GuardResult};
pub use inspect::{LockStatus, clear, inspect};
pub use lock::{LockGuard, acquire, marker_path, with_lock};
pub use record::{CallerContext, LockRecord};

/// File name of the lock marker in a project root.
pub const MARKER: &str = ".setacl_lock";
