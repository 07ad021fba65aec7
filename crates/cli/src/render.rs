//! crates/cli/src/render.rs
//!
//! Text and JSON rendering of role reports and lock status.

use std::io::{self, Write};
use std::path::Path;

use guard::LockStatus;
use reconcile::{RoleAssignment, RolesReport};
use serde::Serialize;

#[derive(Serialize)]
struct PathEntry<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    roles: Option<&'a RoleAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Writes `<path>\t<role>\t<users>` per role of every readable path.
pub(crate) fn write_roles_text<W: Write>(out: &mut W, report: &RolesReport) -> io::Result<()> {
    for (path, roles) in report.successes() {
        for (role, users) in roles.iter() {
            let users: Vec<&str> = users.iter().map(String::as_str).collect();
            writeln!(out, "{}\t{role}\t{}", path.display(), users.join(","))?;
        }
    }
    Ok(())
}

/// Writes the report as a JSON array, failures included.
pub(crate) fn write_roles_json<W: Write>(out: &mut W, report: &RolesReport) -> io::Result<()> {
    let entries: Vec<PathEntry<'_>> = report
        .paths
        .iter()
        .map(|entry| PathEntry {
            path: &entry.path,
            roles: entry.outcome.as_ref().ok(),
            error: entry.outcome.as_ref().err().map(ToString::to_string),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out)
}

/// Writes a human-readable lock report for `project`.
pub(crate) fn write_lock_text<W: Write>(
    out: &mut W,
    project: &str,
    status: Option<&LockStatus>,
) -> io::Result<()> {
    let Some(status) = status else {
        return writeln!(out, "{project}: not locked");
    };

    let stale = if status.is_stale { ", stale" } else { "" };
    let age = status.age.as_secs();
    match &status.record {
        Some(record) => {
            writeln!(
                out,
                "{project}: locked by {} on {} since {} ({age}s{stale})",
                record.caller.identity, record.caller.host, record.timestamp
            )?;
            for ace in &record.aces {
                writeln!(out, "  {ace}")?;
            }
        }
        None => writeln!(
            out,
            "{project}: locked, no readable record in {} ({age}s{stale})",
            status.marker.display()
        )?,
    }
    Ok(())
}

/// Writes the lock status of `project` as JSON; `null` when unlocked.
pub(crate) fn write_lock_json<W: Write>(
    out: &mut W,
    status: Option<&LockStatus>,
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &status)?;
    writeln!(out)
}
