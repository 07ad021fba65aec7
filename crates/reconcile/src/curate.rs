//! crates/reconcile/src/curate.rs
//!
//! Last pass over an ACL before it is written.

use logging::{targets, trace_acl};
use nfs4::{AccountDirectory, AceFlags, Nfs4Acl};

/// Prepares `acl` for writing.
///
/// - `OWNER@`, `GROUP@` and `EVERYONE@` entries get file and directory
///   inheritance, otherwise Windows clients ignore entries made on Linux
///   and vice versa.
/// - Entries for user names that are not local accounts are dropped with a
///   warning. Entries carrying the `g` flag name a group and are checked
///   against the group database instead.
///
/// Order of the retained entries is preserved.
#[must_use]
pub fn curate<A: AccountDirectory + ?Sized>(acl: Nfs4Acl, accounts: &A) -> Nfs4Acl {
    acl.into_iter()
        .filter_map(|mut ace| {
            if ace.principal.is_special() {
                ace.flags = ace.flags.with(AceFlags::INHERIT);
                Some(ace)
            } else if ace.flags.contains(AceFlags::IDENTIFIER_GROUP) {
                if accounts.group_exists(ace.principal.name()) {
                    Some(ace)
                } else {
                    tracing::warn!(
                        target: targets::ACL,
                        "ignore ACE for invalid group: {}",
                        ace.principal.name()
                    );
                    None
                }
            } else if accounts.account_exists(ace.principal.name()) {
                Some(ace)
            } else {
                tracing::warn!(
                    target: targets::ACL,
                    "ignore ACE for invalid user: {}",
                    ace.principal.name()
                );
                None
            }
        })
        .inspect(|ace| {
            trace_acl!("curated ACE: {ace}");
        })
        .collect()
}
