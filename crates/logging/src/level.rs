//! crates/logging/src/level.rs
//! Numeric verbosity levels accepted on the command line.

use std::fmt;

use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Verbosity selected with `-l/--loglevel`.
///
/// The numbering is inherited from the project storage tooling this crate
/// replaces: `0` warnings, `1` errors only, `2` informational, `3` debug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Level 0: warnings and errors.
    #[default]
    Warning,
    /// Level 1: errors only.
    Error,
    /// Level 2: informational progress.
    Info,
    /// Level 3: debug output including ACE dumps.
    Debug,
}

/// Rejected numeric verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid log level {0}: expected 0 (WARNING), 1 (ERROR), 2 (INFO) or 3 (DEBUG)")]
pub struct LevelError(pub u8);

impl LogLevel {
    /// Maps the numeric command-line value.
    pub const fn from_verbosity(value: u8) -> Result<Self, LevelError> {
        match value {
            0 => Ok(Self::Warning),
            1 => Ok(Self::Error),
            2 => Ok(Self::Info),
            3 => Ok(Self::Debug),
            other => Err(LevelError(other)),
        }
    }

    /// Returns the numeric value accepted by [`from_verbosity`](Self::from_verbosity).
    #[must_use]
    pub const fn verbosity(self) -> u8 {
        match self {
            Self::Warning => 0,
            Self::Error => 1,
            Self::Info => 2,
            Self::Debug => 3,
        }
    }

    /// Most verbose tracing level let through at this setting.
    #[must_use]
    pub const fn filter(self) -> LevelFilter {
        match self {
            Self::Warning => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        };
        f.write_str(name)
    }
}
