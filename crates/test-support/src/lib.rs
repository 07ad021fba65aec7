#![deny(unsafe_code)]
#![deny(missing_docs)]

//! Shared test utilities for the prjacl workspace.
//!
//! - [`MemoryBackend`] keeps ACLs in memory and records every write.
//! - [`StaticAccounts`] is a fixed account directory.
//! - [`ProjectTree`] lays out a throwaway project directory on disk.

#![allow(clippy::missing_panics_doc)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use nfs4::{AccountDirectory, AclBackend, Nfs4Acl, Nfs4Error, Nfs4Result, WriteMode, WriteOptions};
use tempfile::TempDir;

/// One call to [`AclBackend::write_acl`] as seen by [`MemoryBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Target path.
    pub path: PathBuf,
    /// Entries handed to the backend.
    pub acl: Nfs4Acl,
    /// Write options.
    pub options: WriteOptions,
    /// Whether the observed marker file existed while writing, if one is
    /// being observed.
    pub marker_present: Option<bool>,
}

#[derive(Default)]
struct State {
    acls: BTreeMap<PathBuf, Nfs4Acl>,
    writes: Vec<RecordedWrite>,
    reads: Vec<PathBuf>,
    failing_reads: BTreeSet<PathBuf>,
    fail_writes: bool,
    marker: Option<PathBuf>,
}

/// In-memory [`AclBackend`].
///
/// Paths without a stored ACL read as empty. Writes are applied to the
/// stored state according to their [`WriteMode`]; recursive writes also
/// reach every stored path below the target.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Stores `text` (one ACE per line) as the ACL of `path`.
    pub fn set_acl_text(&self, path: impl Into<PathBuf>, text: &str) {
        let acl = Nfs4Acl::parse(text).expect("valid ACL text");
        self.state().acls.insert(path.into(), acl);
    }

    /// Returns the stored ACL of `path`.
    #[must_use]
    pub fn acl(&self, path: &Path) -> Nfs4Acl {
        self.state().acls.get(path).cloned().unwrap_or_default()
    }

    /// Returns the stored ACL of `path` rendered one ACE per line.
    #[must_use]
    pub fn acl_lines(&self, path: &Path) -> Vec<String> {
        self.acl(path).iter().map(ToString::to_string).collect()
    }

    /// Makes reads of `path` fail.
    pub fn fail_reads_of(&self, path: impl Into<PathBuf>) {
        self.state().failing_reads.insert(path.into());
    }

    /// Makes every write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    /// Records whether `marker` exists at the moment of each write.
    pub fn observe_marker(&self, marker: impl Into<PathBuf>) {
        self.state().marker = Some(marker.into());
    }

    /// Writes seen so far, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.state().writes.clone()
    }

    /// Paths read so far, in order.
    #[must_use]
    pub fn reads(&self) -> Vec<PathBuf> {
        self.state().reads.clone()
    }

    fn apply(acl: &mut Nfs4Acl, given: &Nfs4Acl, mode: WriteMode) {
        match mode {
            WriteMode::Replace => *acl = given.clone(),
            WriteMode::Append => acl.aces.extend(given.iter().cloned()),
            WriteMode::Remove => acl.aces.retain(|ace| !given.aces.contains(ace)),
        }
    }
}

impl AclBackend for MemoryBackend {
    fn read_acl(&self, path: &Path) -> Nfs4Result<Nfs4Acl> {
        let mut state = self.state();
        state.reads.push(path.to_path_buf());
        if state.failing_reads.contains(path) {
            return Err(Nfs4Error::ToolFailed {
                command: format!("nfs4_getfacl {}", path.display()),
                status: "exit status: 1".to_owned(),
                stderr: "Permission denied".to_owned(),
            });
        }
        Ok(state.acls.get(path).cloned().unwrap_or_default())
    }

    fn write_acl(&self, path: &Path, acl: &Nfs4Acl, options: WriteOptions) -> Nfs4Result<()> {
        let mut state = self.state();
        let marker_present = state.marker.as_deref().map(Path::exists);
        state.writes.push(RecordedWrite {
            path: path.to_path_buf(),
            acl: acl.clone(),
            options,
            marker_present,
        });

        if state.fail_writes {
            return Err(Nfs4Error::ToolFailed {
                command: format!("nfs4_setfacl {} {}", options.mode.flag(), path.display()),
                status: "exit status: 1".to_owned(),
                stderr: "Operation not permitted".to_owned(),
            });
        }

        let existing = state.acls.entry(path.to_path_buf()).or_default();
        Self::apply(existing, acl, options.mode);
        if options.recursive {
            for (stored, current) in &mut state.acls {
                if stored != path && stored.starts_with(path) {
                    Self::apply(current, acl, options.mode);
                }
            }
        }
        Ok(())
    }
}

/// Fixed set of known account and group names.
#[derive(Clone, Debug, Default)]
pub struct StaticAccounts {
    names: BTreeSet<String>,
    groups: BTreeSet<String>,
}

impl StaticAccounts {
    /// Accounts named by `names`.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            groups: BTreeSet::new(),
        }
    }

    /// Adds the groups named by `groups`.
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }
}

impl AccountDirectory for StaticAccounts {
    fn account_exists(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn group_exists(&self, name: &str) -> bool {
        self.groups.contains(name)
    }
}

/// A temporary directory holding project directories.
pub struct ProjectTree {
    root: TempDir,
}

impl ProjectTree {
    /// Creates an empty base directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// The base directory, i.e. what `/project` is in production.
    #[must_use]
    pub fn base(&self) -> &Path {
        self.root.path()
    }

    /// Creates directory `relative` (and its parents) and returns its path.
    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        fs::create_dir_all(&path).expect("create dir");
        path
    }

    /// Creates file `relative` with `contents` and returns its path.
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write file");
        path
    }
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_paths_read_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.read_acl(Path::new("/p")).unwrap().is_empty());
        assert_eq!(backend.reads(), vec![PathBuf::from("/p")]);
    }

    #[test]
    fn recursive_replace_reaches_children() {
        let backend = MemoryBackend::new();
        backend.set_acl_text("/p", "A::OWNER@:r");
        backend.set_acl_text("/p/sub", "A::OWNER@:r");
        backend.set_acl_text("/q", "A::OWNER@:r");

        let acl = Nfs4Acl::parse("A::OWNER@:rw").unwrap();
        backend
            .write_acl(Path::new("/p"), &acl, WriteOptions::recursive(WriteMode::Replace))
            .unwrap();

        assert_eq!(backend.acl_lines(Path::new("/p/sub")), vec!["A::OWNER@:rw"]);
        assert_eq!(backend.acl_lines(Path::new("/q")), vec!["A::OWNER@:r"]);
    }

    #[test]
    fn remove_drops_matching_entries() {
        let backend = MemoryBackend::new();
        backend.set_acl_text("/p", "A::OWNER@:r\nA:fd:bob@example.org:rxy");
        let acl = Nfs4Acl::parse("A:fd:bob@example.org:rxy").unwrap();
        backend
            .write_acl(Path::new("/p"), &acl, WriteOptions::single(WriteMode::Remove))
            .unwrap();
        assert_eq!(backend.acl_lines(Path::new("/p")), vec!["A::OWNER@:r"]);
    }

    #[test]
    fn failures_are_injectable() {
        let backend = MemoryBackend::new();
        backend.fail_reads_of("/p");
        backend.fail_writes(true);
        assert!(backend.read_acl(Path::new("/p")).is_err());
        assert!(
            backend
                .write_acl(Path::new("/p"), &Nfs4Acl::new(), WriteOptions::default())
                .is_err()
        );
        assert_eq!(backend.writes().len(), 1);
    }

    #[test]
    fn static_accounts() {
        let accounts = StaticAccounts::new(["alice", "bob"]);
        assert!(accounts.account_exists("alice"));
        assert!(!accounts.account_exists("mallory"));
    }

    #[test]
    fn project_tree_creates_entries() {
        let tree = ProjectTree::new();
        let dir = tree.dir("3010000.01/raw");
        let file = tree.file("3010000.01/raw/data.bin", "x");
        assert!(dir.is_dir());
        assert!(file.is_file());
        assert!(dir.starts_with(tree.base()));
    }
}
