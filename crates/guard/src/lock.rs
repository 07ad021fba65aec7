//! crates/guard/src/lock.rs
//!
//! Taking and releasing the project lock.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use dashmap::DashSet;
use logging::{targets, trace_lock};

use crate::MARKER;
use crate::error::{GuardError, GuardResult};
use crate::record::{CallerContext, LockRecord};

/// Project roots locked by this process.
///
/// The marker file alone cannot stop two threads from both seeing it absent.
static HELD: LazyLock<DashSet<PathBuf>> = LazyLock::new(DashSet::new);

/// Returns the marker path for `root`.
#[must_use]
pub fn marker_path(root: &Path) -> PathBuf {
    root.join(MARKER)
}

/// RAII guard for a held project lock.
///
/// Dropping the guard removes the marker. Use [`LockGuard::release`] to
/// observe removal failures.
#[must_use = "dropping the guard immediately releases the lock"]
#[derive(Debug)]
pub struct LockGuard {
    root: PathBuf,
    marker: PathBuf,
    released: bool,
}

impl LockGuard {
    /// Path of the marker file this guard owns.
    #[must_use]
    pub fn marker(&self) -> &Path {
        &self.marker
    }

    /// Releases the lock, reporting a failure to remove the marker.
    pub fn release(mut self) -> GuardResult<()> {
        self.remove()
    }

    fn remove(&mut self) -> GuardResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        HELD.remove(&self.root);
        match fs::remove_file(&self.marker) {
            Ok(()) => {
                trace_lock!("released {}", self.marker.display());
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(
                    target: targets::LOCK,
                    "lock file '{}' vanished before release",
                    self.marker.display()
                );
                Ok(())
            }
            Err(err) => Err(GuardError::io(&self.marker, err)),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(err) = self.remove() {
            tracing::error!(target: targets::LOCK, "{err}");
        }
    }
}

/// Takes the lock of `root`, persisting who is about to apply which ACEs.
///
/// Fails with [`GuardError::LockHeld`] without touching anything when the
/// marker already exists or another thread of this process holds the root.
pub fn acquire(root: &Path, caller: &CallerContext, aces: &[String]) -> GuardResult<LockGuard> {
    let marker = marker_path(root);

    if !HELD.insert(root.to_path_buf()) {
        return Err(GuardError::LockHeld { marker });
    }

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&marker);
    let mut file = match file {
        Ok(file) => file,
        Err(err) => {
            HELD.remove(root);
            return Err(if err.kind() == io::ErrorKind::AlreadyExists {
                GuardError::LockHeld { marker }
            } else {
                GuardError::io(&marker, err)
            });
        }
    };

    // From here on the guard owns the marker and removes it on any failure.
    let guard = LockGuard {
        root: root.to_path_buf(),
        marker,
        released: false,
    };

    let record = LockRecord::now(caller, aces)?;
    let json = serde_json::to_vec_pretty(&record).map_err(|source| GuardError::Record {
        marker: guard.marker.clone(),
        source,
    })?;
    file.write_all(&json)
        .and_then(|()| file.sync_all())
        .map_err(|err| GuardError::io(&guard.marker, err))?;

    trace_lock!("acquired {}", guard.marker.display());
    Ok(guard)
}

/// Runs `mutation` while holding the lock of `root`.
///
/// The marker is removed once `mutation` returns, whether it succeeded or
/// not. A failure of `mutation` takes precedence over a failure to remove
/// the marker, which is then only logged.
pub fn with_lock<T, E, F>(
    root: &Path,
    caller: &CallerContext,
    aces: &[String],
    mutation: F,
) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<GuardError>,
{
    let guard = acquire(root, caller, aces)?;
    let outcome = mutation();
    match (outcome, guard.release()) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(release)) => Err(release.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(release)) => {
            tracing::error!(target: targets::LOCK, "{release}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller() -> CallerContext {
        CallerContext::new("alice", "mentat001")
    }

    #[test]
    fn marker_lives_in_project_root() {
        assert_eq!(
            marker_path(Path::new("/project/3010000.01")),
            PathBuf::from("/project/3010000.01/.setacl_lock")
        );
    }

    #[test]
    fn acquire_writes_record_and_drop_removes_it() {
        let root = tempfile::tempdir().unwrap();
        let aces = vec!["A:fd:bob@dccn.nl:rxy".to_owned()];
        let guard = acquire(root.path(), &caller(), &aces).unwrap();

        let text = fs::read_to_string(guard.marker()).unwrap();
        let record: LockRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(record.aces, aces);
        assert_eq!(record.caller, caller());

        let marker = guard.marker().to_path_buf();
        drop(guard);
        assert!(!marker.exists());
    }

    #[test]
    fn existing_marker_is_left_alone() {
        let root = tempfile::tempdir().unwrap();
        let marker = marker_path(root.path());
        fs::write(&marker, "someone else").unwrap();

        let err = acquire(root.path(), &caller(), &[]).unwrap_err();
        assert!(err.is_lock_held());
        assert_eq!(fs::read_to_string(&marker).unwrap(), "someone else");
    }

    #[test]
    fn second_acquire_in_process_is_refused() {
        let root = tempfile::tempdir().unwrap();
        let first = acquire(root.path(), &caller(), &[]).unwrap();
        assert!(acquire(root.path(), &caller(), &[]).unwrap_err().is_lock_held());
        first.release().unwrap();
        acquire(root.path(), &caller(), &[]).unwrap().release().unwrap();
    }

    #[test]
    fn missing_root_is_io_error() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("gone");
        let err = acquire(&missing, &caller(), &[]).unwrap_err();
        assert!(matches!(err, GuardError::Io { .. }));
        // The in-process slot is freed again.
        assert!(matches!(
            acquire(&missing, &caller(), &[]).unwrap_err(),
            GuardError::Io { .. }
        ));
    }

    #[test]
    fn with_lock_releases_after_failure() {
        let root = tempfile::tempdir().unwrap();
        let marker = marker_path(root.path());

        let result: Result<(), GuardError> = with_lock(root.path(), &caller(), &[], || {
            assert!(marker.exists());
            Err(GuardError::io(&marker, io::Error::other("setfacl crashed")))
        });
        assert!(matches!(result, Err(GuardError::Io { .. })));
        assert!(!marker.exists());
    }

    #[test]
    fn with_lock_returns_value() {
        let root = tempfile::tempdir().unwrap();
        let value: Result<u32, GuardError> = with_lock(root.path(), &caller(), &[], || Ok(7));
        assert_eq!(value.unwrap(), 7);
        assert!(!marker_path(root.path()).exists());
    }

    #[test]
    fn with_lock_reports_vanished_marker_as_success() {
        let root = tempfile::tempdir().unwrap();
        let marker = marker_path(root.path());
        let result: Result<(), GuardError> = with_lock(root.path(), &caller(), &[], || {
            fs::remove_file(&marker).unwrap();
            Ok(())
        });
        assert!(result.is_ok());
    }
}
