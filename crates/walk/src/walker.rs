use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::path::{self, PathBuf};

use logging::trace_walk;

use crate::entry::{EntryKind, WalkEntry};
use crate::error::WalkError;

/// Depth-first iterator over the directories and files below a root.
///
/// Errors are yielded in place of the entries they concern, so a caller can
/// record them and keep going.
pub struct Walker {
    root: Option<WalkEntry>,
    skipped: Vec<OsString>,
    stack: Vec<Listing>,
    pending: VecDeque<WalkError>,
}

impl Walker {
    pub(crate) fn new(
        root: PathBuf,
        include_root: bool,
        skipped: Vec<OsString>,
    ) -> Result<Self, WalkError> {
        let root = path::absolute(&root).map_err(|source| WalkError::Root {
            path: root.clone(),
            source,
        })?;
        let metadata = fs::symlink_metadata(&root).map_err(|source| WalkError::Root {
            path: root.clone(),
            source,
        })?;
        trace_walk!("walking {:?}", root);

        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let mut walker = Self {
            root: None,
            skipped,
            stack: Vec::new(),
            pending: VecDeque::new(),
        };
        if kind == EntryKind::Directory {
            walker.descend(root.clone(), PathBuf::new(), 0);
        }
        if include_root {
            walker.root = Some(WalkEntry {
                path: root,
                relative: PathBuf::new(),
                kind,
                depth: 0,
            });
        }
        Ok(walker)
    }

    fn descend(&mut self, path: PathBuf, relative: PathBuf, depth: usize) {
        match Listing::read(path, relative, depth) {
            Ok((listing, errors)) => {
                self.stack.push(listing);
                self.pending.extend(errors);
            }
            Err(error) => self.pending.push_back(error),
        }
    }

    fn visit(&mut self, path: PathBuf, relative: PathBuf, depth: usize) -> Option<WalkEntry> {
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(source) => {
                self.pending.push_back(WalkError::Stat { path, source });
                return None;
            }
        };

        if metadata.file_type().is_symlink() {
            trace_walk!("skipping symlink {:?}", path);
            return None;
        }

        let kind = if metadata.is_dir() {
            self.descend(path.clone(), relative.clone(), depth);
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Some(WalkEntry {
            path,
            relative,
            kind,
            depth,
        })
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            return Some(Ok(root));
        }

        loop {
            if let Some(error) = self.pending.pop_front() {
                return Some(Err(error));
            }

            let listing = self.stack.last_mut()?;
            let Some(name) = listing.names.next() else {
                self.stack.pop();
                continue;
            };
            if self.skipped.contains(&name) {
                trace_walk!("skipping {:?} in {:?}", name, listing.path);
                continue;
            }
            let path = listing.path.join(&name);
            let relative = listing.relative.join(&name);
            let depth = listing.depth + 1;

            if let Some(entry) = self.visit(path, relative, depth) {
                return Some(Ok(entry));
            }
        }
    }
}

/// Sorted names of one directory still to be visited.
struct Listing {
    path: PathBuf,
    relative: PathBuf,
    names: std::vec::IntoIter<OsString>,
    depth: usize,
}

impl Listing {
    /// An unlistable directory is a single error; unreadable entries are
    /// returned next to the listing.
    fn read(
        path: PathBuf,
        relative: PathBuf,
        depth: usize,
    ) -> Result<(Self, Vec<WalkError>), WalkError> {
        let read_dir = fs::read_dir(&path).map_err(|source| WalkError::ReadDir {
            path: path.clone(),
            source,
        })?;

        let mut names = Vec::new();
        let mut errors = Vec::new();
        for entry in read_dir {
            match entry {
                Ok(entry) => names.push(entry.file_name()),
                Err(source) => errors.push(WalkError::ReadDirEntry {
                    path: path.clone(),
                    source,
                }),
            }
        }
        names.sort();
        trace_walk!("found {} entries in {:?}", names.len(), path);

        let listing = Self {
            path,
            relative,
            names: names.into_iter(),
            depth,
        };
        Ok((listing, errors))
    }
}
