//! crates/guard/src/inspect.rs
//!
//! Operator view of a lock marker. Stale markers are reported, never
//! removed automatically.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use logging::targets;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::{GuardError, GuardResult};
use crate::lock::marker_path;
use crate::record::LockRecord;

/// State of a present lock marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LockStatus {
    /// Path of the marker file.
    pub marker: PathBuf,
    /// Parsed record, or `None` when the marker does not hold one.
    pub record: Option<LockRecord>,
    /// Time since the lock was taken.
    pub age: Duration,
    /// `true` once `age` reaches the staleness threshold.
    pub is_stale: bool,
}

/// Reports the lock of `root`, or `None` if it is not locked.
///
/// The age comes from the record's timestamp, falling back to the marker's
/// modification time when the record is unreadable.
pub fn inspect(root: &Path, stale_after: Duration) -> GuardResult<Option<LockStatus>> {
    let marker = marker_path(root);
    let text = match fs::read_to_string(&marker) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(GuardError::io(&marker, err)),
    };

    let record = match serde_json::from_str::<LockRecord>(&text) {
        Ok(record) => Some(record),
        Err(err) => {
            tracing::warn!(
                target: targets::LOCK,
                "lock file '{}' holds no readable record: {err}",
                marker.display()
            );
            None
        }
    };

    let age = match &record {
        Some(record) => Duration::from_secs(record.age_secs_at(OffsetDateTime::now_utc())),
        None => {
            let modified = fs::metadata(&marker)
                .and_then(|meta| meta.modified())
                .map_err(|err| GuardError::io(&marker, err))?;
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO)
        }
    };

    Ok(Some(LockStatus {
        marker,
        record,
        age,
        is_stale: age >= stale_after,
    }))
}

/// Removes the lock marker of `root`. Returns whether there was one.
pub fn clear(root: &Path) -> GuardResult<bool> {
    let marker = marker_path(root);
    match fs::remove_file(&marker) {
        Ok(()) => {
            tracing::warn!(target: targets::LOCK, "removed lock file '{}'", marker.display());
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(GuardError::io(&marker, err)),
    }
}
