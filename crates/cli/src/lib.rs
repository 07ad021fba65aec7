#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front-end of `prjacl`. It parses the
//! arguments, resolves the settings and hands the subcommand to
//! [`reconcile::ProjectAcl`] or, for lock maintenance, to [`guard`].
//!
//! | Subcommand | Effect |
//! |------------|--------|
//! | `get PID [-p PATH] [-R] [--json]` | Report users per role. |
//! | `set PID [-p PATH] [-a U] [-c U] [-u U] [-t U] [-f] [--no-recursive]` | Grant roles. |
//! | `delete USERS PID... [-r ROLE]...` | Remove users from projects. |
//! | `lock status PID [--json]` / `lock clear PID` | Inspect or clear a lock. |
//!
//! # Design
//!
//! [`run`] accepts an iterator of arguments together with handles for
//! standard output and error and returns the exit status, so the binary is a
//! one-line `main` and tests can drive the whole front-end in memory. Argument
//! parsing uses the [`clap`](https://docs.rs/clap/) builder API; [`Settings`]
//! layers built-in defaults, a TOML file and the command-line flags.
//!
//! # Invariants
//!
//! - `run` never panics; failures surface as the statuses in [`exit`].
//! - The invoking user is never removed from a project by `delete`.
//! - A stale lock is only removed by an explicit `lock clear`.
//!
//! # Errors
//!
//! | Status | Meaning |
//! |--------|---------|
//! | 0 | Success, including "nothing to do". |
//! | 1 | Invalid arguments, settings or role request. |
//! | 2 | At least one path or project failed. |
//! | 3 | A project was locked by another mutation. |
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(["prjacl", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("prjacl "));
//! ```

use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;
use logging::targets;
use nfs4::SystemAccounts;

mod arguments;
mod caller;
mod command;
mod execute;
pub mod exit;
mod render;
mod settings;

pub use arguments::{Action, GlobalArgs, LockAction, ParsedArgs, csv_list, parse_args};
pub use caller::caller_context;
pub use settings::{
    CONFIG_ENV_VAR, DEFAULT_BASEDIR, DEFAULT_STALE_AFTER, Settings, SettingsError,
};

use execute::Executor;

/// Reports a parse failure; help and version requests go to `stdout`.
fn report_parse_error<Out: Write, Err: Write>(
    error: &clap::Error,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{}", error.render());
            exit::SUCCESS
        }
        _ => {
            let _ = write!(stderr, "{}", error.render());
            exit::USAGE
        }
    }
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// The first argument is the program name. Returns the process exit status.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from("prjacl"));
    }

    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => return report_parse_error(&error, stdout, stderr),
    };

    let settings = match Settings::resolve(&parsed.global, std::env::var_os(CONFIG_ENV_VAR)) {
        Ok(settings) => settings,
        Err(error) => {
            let _ = writeln!(stderr, "prjacl: {error}");
            return exit::USAGE;
        }
    };

    if logging::init_tracing(settings.loglevel).is_err() {
        tracing::debug!(target: targets::CMD, "tracing subscriber already installed");
    }

    let backend = settings.tools();
    let caller = caller_context();
    let executor = Executor {
        settings: &settings,
        backend: &backend,
        accounts: &SystemAccounts,
        caller: &caller,
    };
    executor.execute(parsed.action, stdout, stderr)
}
