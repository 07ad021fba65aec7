//! crates/logging/src/subscriber.rs
//! Global subscriber installation.

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::format::BracketFormat;
use crate::level::LogLevel;

/// Environment variable holding an `EnvFilter` directive that overrides the
/// command-line level, e.g. `PRJACL_LOG=prjacl::lock=debug`.
pub const ENV_VAR: &str = "PRJACL_LOG";

/// Builds the event filter for `level`.
///
/// A non-empty, well-formed `directives` string takes precedence over the
/// level; anything else falls back to the level alone.
#[must_use]
pub fn build_filter(level: LogLevel, directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.filter().into()))
}

/// Installs the global tracing subscriber writing to standard error.
///
/// Fails if a global subscriber has already been installed.
pub fn init_tracing(level: LogLevel) -> Result<(), TryInitError> {
    let directives = std::env::var(ENV_VAR).ok();
    let filter = build_filter(level, directives.as_deref());

    let layer = tracing_subscriber::fmt::layer()
        .event_format(BracketFormat)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
}
