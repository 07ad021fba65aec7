//! crates/nfs4/src/tools.rs
//!
//! [`AclBackend`] implementation driving `nfs4_getfacl` and `nfs4_setfacl`.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use logging::trace_cmd;

use crate::ace::Nfs4Acl;
use crate::backend::{AclBackend, WriteOptions};
use crate::error::{Nfs4Error, Nfs4Result};

/// Program reading ACLs unless configured otherwise.
pub const DEFAULT_GETFACL: &str = "nfs4_getfacl";
/// Program writing ACLs unless configured otherwise.
pub const DEFAULT_SETFACL: &str = "nfs4_setfacl";

/// Returns the path argument handed to the ACL tools.
///
/// Directories get a trailing `/`. Some NetApp exports reject ACL calls on a
/// directory path without it.
#[must_use]
pub fn tool_path(path: &Path) -> OsString {
    let mut arg = path.as_os_str().to_owned();
    if path.is_dir() && !arg.as_encoded_bytes().ends_with(b"/") {
        arg.push("/");
    }
    arg
}

/// Builder for one invocation of an ACL tool.
#[derive(Clone, Debug)]
pub struct FaclCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl FaclCommand {
    /// Creates a command running `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn push_arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Returns the program and argument vector.
    #[must_use]
    pub fn command_parts(&self) -> (&OsStr, &[OsString]) {
        (&self.program, &self.args)
    }

    /// Renders the command line for diagnostics.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(OsStr::to_string_lossy)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the command to completion and returns its standard output.
    ///
    /// Exit status 0 is success. Any other status is reported as
    /// [`Nfs4Error::ToolFailed`] carrying the trimmed standard error.
    pub fn run(&self) -> Nfs4Result<String> {
        trace_cmd!("running {}", self.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| Nfs4Error::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;

        if !output.status.success() {
            return Err(Nfs4Error::ToolFailed {
                command: self.display(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The nfs4-acl-tools programs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfs4Tools {
    getfacl: OsString,
    setfacl: OsString,
}

impl Default for Nfs4Tools {
    fn default() -> Self {
        Self::new(DEFAULT_GETFACL, DEFAULT_SETFACL)
    }
}

impl Nfs4Tools {
    /// Uses the given programs in place of the defaults.
    #[must_use]
    pub fn new(getfacl: impl Into<OsString>, setfacl: impl Into<OsString>) -> Self {
        Self {
            getfacl: getfacl.into(),
            setfacl: setfacl.into(),
        }
    }

    /// Command reading the ACL of `path`.
    #[must_use]
    pub fn getfacl_command(&self, path: &Path) -> FaclCommand {
        let mut command = FaclCommand::new(&self.getfacl);
        command.push_arg(tool_path(path));
        command
    }

    /// Command applying `acl` to `path`.
    #[must_use]
    pub fn setfacl_command(&self, path: &Path, acl: &Nfs4Acl, options: WriteOptions) -> FaclCommand {
        let mut command = FaclCommand::new(&self.setfacl);
        if options.recursive {
            command.push_arg("-R");
        }
        command
            .push_arg(options.mode.flag())
            .push_arg(acl.to_spec())
            .push_arg(tool_path(path));
        command
    }
}

impl AclBackend for Nfs4Tools {
    fn read_acl(&self, path: &Path) -> Nfs4Result<Nfs4Acl> {
        let stdout = self.getfacl_command(path).run()?;
        Nfs4Acl::parse(&stdout)
    }

    fn write_acl(&self, path: &Path, acl: &Nfs4Acl, options: WriteOptions) -> Nfs4Result<()> {
        self.setfacl_command(path, acl, options).run().map(drop)
    }
}
