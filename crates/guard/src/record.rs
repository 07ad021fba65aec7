//! crates/guard/src/record.rs
//!
//! The record persisted inside the lock marker.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::GuardResult;

/// Who is mutating the ACL, as recorded in the lock marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Account name of the caller.
    pub identity: String,
    /// Host the caller runs on.
    pub host: String,
}

impl CallerContext {
    /// Creates a caller context.
    #[must_use]
    pub fn new(identity: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            host: host.into(),
        }
    }
}

/// Contents of a lock marker.
///
/// Enough to find out after a crash who was changing what, and since when.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Acquisition time, RFC 3339.
    pub timestamp: String,
    /// Acquisition time, seconds since the Unix epoch.
    pub unix_timestamp: i64,
    /// Who took the lock.
    pub caller: CallerContext,
    /// The ACEs about to be applied, one per element.
    pub aces: Vec<String>,
}

impl LockRecord {
    /// Creates a record stamped with the current time.
    pub fn now(caller: &CallerContext, aces: &[String]) -> GuardResult<Self> {
        let now = OffsetDateTime::now_utc();
        Ok(Self {
            timestamp: now.format(&Rfc3339)?,
            unix_timestamp: now.unix_timestamp(),
            caller: caller.clone(),
            aces: aces.to_vec(),
        })
    }

    /// Seconds elapsed between acquisition and `now`, never negative.
    #[must_use]
    pub fn age_secs_at(&self, now: OffsetDateTime) -> u64 {
        u64::try_from(now.unix_timestamp() - self.unix_timestamp).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller() -> CallerContext {
        CallerContext::new("alice", "mentat001")
    }

    #[test]
    fn record_captures_caller_and_aces() {
        let aces = vec!["A:fd:bob@dccn.nl:rxy".to_owned()];
        let record = LockRecord::now(&caller(), &aces).unwrap();
        assert_eq!(record.caller.identity, "alice");
        assert_eq!(record.caller.host, "mentat001");
        assert_eq!(record.aces, aces);
        let parsed = OffsetDateTime::parse(&record.timestamp, &Rfc3339).unwrap();
        assert_eq!(parsed.unix_timestamp(), record.unix_timestamp);
    }

    #[test]
    fn json_is_self_describing() {
        let record = LockRecord::now(&caller(), &["A::OWNER@:rwx".to_owned()]).unwrap();
        let json = serde_json::to_string_pretty(&record).unwrap();
        for key in ["timestamp", "unix_timestamp", "identity", "host", "aces"] {
            assert!(json.contains(key), "{key} missing from {json}");
        }
        let back: LockRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn age_is_clamped_at_zero() {
        let record = LockRecord::now(&caller(), &[]).unwrap();
        let before = OffsetDateTime::from_unix_timestamp(record.unix_timestamp - 10).unwrap();
        let after = OffsetDateTime::from_unix_timestamp(record.unix_timestamp + 90).unwrap();
        assert_eq!(record.age_secs_at(before), 0);
        assert_eq!(record.age_secs_at(after), 90);
    }
}
