//! crates/nfs4/src/accounts.rs
//!
//! Local account lookup used to weed out ACEs for users and groups that no
//! longer exist.

/// Answers whether a principal name belongs to a known user or group.
pub trait AccountDirectory {
    /// Returns `true` if `name` is a valid system account.
    fn account_exists(&self, name: &str) -> bool;

    /// Returns `true` if `name` is a valid system group.
    fn group_exists(&self, name: &str) -> bool;
}

impl<T: AccountDirectory + ?Sized> AccountDirectory for &T {
    fn account_exists(&self, name: &str) -> bool {
        (**self).account_exists(name)
    }

    fn group_exists(&self, name: &str) -> bool {
        (**self).group_exists(name)
    }
}

/// Looks names up in the system user database.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAccounts;

#[cfg(unix)]
impl AccountDirectory for SystemAccounts {
    fn account_exists(&self, name: &str) -> bool {
        uzers::get_user_by_name(name).is_some()
    }

    fn group_exists(&self, name: &str) -> bool {
        uzers::get_group_by_name(name).is_some()
    }
}

#[cfg(not(unix))]
impl AccountDirectory for SystemAccounts {
    fn account_exists(&self, _name: &str) -> bool {
        false
    }

    fn group_exists(&self, _name: &str) -> bool {
        false
    }
}
