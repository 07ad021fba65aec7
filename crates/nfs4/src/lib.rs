#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! NFSv4 Access Control List support for project storage.
//!
//! NFSv4 ACLs differ significantly from POSIX ACLs:
//!
//! - **ACE-based model**: Each Access Control Entry (ACE) specifies allow/deny
//!   permissions for a specific principal (user, group, or special identifiers).
//! - **Granular permissions**: 14 distinct permission bits vs POSIX's 3 (rwx).
//! - **Inheritance**: Rich inheritance model for directories.
//! - **Order matters**: ACEs are evaluated in order; first match wins.
//!
//! This crate does not talk to the kernel directly. ACLs are read and written
//! through the `nfs4_getfacl` and `nfs4_setfacl` programs from nfs4-acl-tools,
//! which render each ACE as one line of text.
//!
//! # Text Format
//!
//! ```text
//! type:flags:principal:mask
//! A:fd:alice@example.org:rwaDdxnNtTcCoy
//! A::OWNER@:rwatTnNcCy
//! D:g:GROUP@:wa
//! ```
//!
//! - Type: `A` (allow), `D` (deny), `U` (audit), `L` (alarm).
//! - Flags: inheritance and audit letters, see [`AceFlags`].
//! - Principal: `name@domain`, or one of `OWNER@`, `GROUP@`, `EVERYONE@`.
//! - Mask: permission letters, see [`permissions::Permission`].
//!
//! # Adapters
//!
//! - [`AclBackend`] is the read/write seam the reconciler consumes;
//!   [`Nfs4Tools`] implements it by running the nfs4-acl-tools programs.
//! - [`AccountDirectory`] answers whether a user name is a local account;
//!   [`SystemAccounts`] consults the system user database.

mod accounts;
mod ace;
mod backend;
mod error;
mod tools;

pub use accounts::{AccountDirectory, SystemAccounts};
pub use ace::{Ace, AceFlags, AceType, Nfs4Acl, Principal, SpecialPrincipal};
pub use backend::{AclBackend, WriteMode, WriteOptions};
pub use error::{Nfs4Error, Nfs4Result};
pub use tools::{DEFAULT_GETFACL, DEFAULT_SETFACL, FaclCommand, Nfs4Tools, tool_path};
