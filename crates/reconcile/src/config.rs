//! crates/reconcile/src/config.rs

use nfs4::Principal;
use serde::{Deserialize, Serialize};

/// Realm appended to user names in ACE principals.
pub const DEFAULT_DOMAIN: &str = "dccn.nl";

/// Reconciler settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Principal domain, as in `alice@<domain>`.
    pub domain: String,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_owned(),
        }
    }
}

impl AclConfig {
    /// Uses `domain` for principals.
    #[must_use]
    pub fn with_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// The principal for `user`.
    #[must_use]
    pub fn principal(&self, user: &str) -> Principal {
        Principal::user(user, self.domain.as_str())
    }
}
