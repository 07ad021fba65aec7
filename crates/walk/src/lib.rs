#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` enumerates a project tree so that ACLs can be reported for every
//! directory and file below a path. Ordering is stable: directory entries are
//! sorted lexicographically before they are yielded.
//!
//! # Design
//!
//! - [`WalkBuilder`] configures traversal: whether the root entry itself is
//!   emitted and which entry names (such as a lock marker) are left out.
//! - [`Walker`] implements [`Iterator`] and yields [`WalkEntry`] values, each
//!   tagged with an [`EntryKind`], in
//!   depth-first order. A directory's contents are processed before the walker
//!   moves to the next sibling.
//! - [`WalkError`] describes an I/O failure together with the offending path.
//!
//! # Invariants
//!
//! - Symbolic links are never yielded or followed. A link may point outside
//!   the project, and ACL tools act on the link target.
//! - A directory that cannot be listed is still yielded, followed by a
//!   [`WalkError::ReadDir`]; traversal then continues with its siblings.
//!   Only a failure on the root itself ends the walk.
//! - Relative paths never contain `..` segments.
//!
//! # Examples
//!
//! ```
//! use std::fs;
//! use std::path::Path;
//! use walk::WalkBuilder;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("3010000.01");
//! fs::create_dir_all(root.join("raw"))?;
//! fs::write(root.join("raw/sub-01.nii"), b"data")?;
//!
//! let seen: Vec<_> = WalkBuilder::new(&root)
//!     .include_root(false)
//!     .skip_name(".setacl_lock")
//!     .build()?
//!     .filter_map(Result::ok)
//!     .map(|entry| entry.relative().to_path_buf())
//!     .collect();
//!
//! assert_eq!(seen, [Path::new("raw"), Path::new("raw/sub-01.nii")]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod walker;

pub use builder::WalkBuilder;
pub use entry::{EntryKind, WalkEntry};
pub use error::WalkError;
pub use walker::Walker;
