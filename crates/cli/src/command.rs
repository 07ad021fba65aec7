//! crates/cli/src/command.rs
//!
//! The `clap` definition of the `prjacl` command line.

use std::path::{Component, Path, PathBuf};

use clap::builder::OsStringValueParser;
use clap::{Arg, ArgAction, Command, value_parser};
use permissions::Role;

/// Accepts only paths that stay below the project directory: no root,
/// no prefix and no `..`.
fn relative_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
    {
        Ok(path)
    } else {
        Err(format!("'{value}' must stay inside the project directory"))
    }
}

/// A project id names exactly one directory under the base directory.
fn project_id(value: &str) -> Result<String, String> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(value.to_owned()),
        _ => Err(format!("'{value}' is not a project id")),
    }
}

fn project_arg() -> Arg {
    Arg::new("project")
        .value_name("PID")
        .help("Project id, i.e. the directory name under the base directory.")
        .value_parser(project_id)
        .required(true)
}

fn path_arg() -> Arg {
    Arg::new("path")
        .long("path")
        .short('p')
        .value_name("PATH")
        .help("Path inside the project (default: the project directory itself).")
        .value_parser(relative_path)
}

fn users_arg(role: Role, short: char) -> Arg {
    Arg::new(role.name())
        .long(role.name())
        .short(short)
        .value_name("USERS")
        .help(format!("Comma-separated users to grant the {role} role."))
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print the result as JSON.")
        .action(ArgAction::SetTrue)
}

fn get_command() -> Command {
    Command::new("get")
        .about("Report users per role on a project path.")
        .arg(project_arg())
        .arg(path_arg())
        .arg(
            Arg::new("recursive")
                .long("recursive")
                .short('R')
                .help("Report every file and directory below the path too.")
                .action(ArgAction::SetTrue),
        )
        .arg(json_arg())
}

fn set_command() -> Command {
    Command::new("set")
        .about("Grant roles to users on a project path.")
        .arg(project_arg())
        .arg(path_arg())
        .arg(users_arg(Role::Admin, 'a'))
        .arg(users_arg(Role::Contributor, 'c'))
        .arg(users_arg(Role::User, 'u'))
        .arg(users_arg(Role::Traverse, 't'))
        .arg(
            Arg::new("force")
                .long("force")
                .short('f')
                .help("Rewrite entries of users that already hold the requested role.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-recursive")
                .long("no-recursive")
                .help("Only change the path itself, not its contents.")
                .action(ArgAction::SetTrue),
        )
}

fn delete_command() -> Command {
    Command::new("delete")
        .about("Remove users from one or more projects.")
        .arg(
            Arg::new("users")
                .value_name("USERS")
                .help("Comma-separated users to remove.")
                .required(true),
        )
        .arg(
            Arg::new("projects")
                .value_name("PID")
                .help("Project ids to remove the users from.")
                .value_parser(project_id)
                .required(true)
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("role")
                .long("role")
                .short('r')
                .value_name("ROLE")
                .help("Only remove entries of this role; may be repeated.")
                .value_parser(|value: &str| value.parse::<Role>())
                .action(ArgAction::Append),
        )
}

fn lock_command() -> Command {
    Command::new("lock")
        .about("Inspect or clear the mutation lock of a project.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("status")
                .about("Show who holds the lock and since when.")
                .arg(project_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("clear")
                .about("Remove a lock left behind by a crashed process.")
                .arg(project_arg()),
        )
}

/// Builds the `clap` command used for parsing.
pub(crate) fn clap_command() -> Command {
    Command::new("prjacl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage role-based NFSv4 access control on project storage.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("loglevel")
                .long("loglevel")
                .short('l')
                .value_name("LEVEL")
                .help("Verbosity: 0 WARNING, 1 ERROR, 2 INFO, 3 DEBUG (default: 0).")
                .value_parser(value_parser!(u8).range(0..=3))
                .global(true),
        )
        .arg(
            Arg::new("basedir")
                .long("basedir")
                .short('d')
                .value_name("DIR")
                .help("Directory holding the project directories (default: /project).")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("domain")
                .long("domain")
                .value_name("DOMAIN")
                .help("Domain appended to user names in ACEs (default: dccn.nl).")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Read settings from FILE instead of $PRJACL_CONFIG.")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("getfacl")
                .long("getfacl")
                .value_name("PROGRAM")
                .help("Program used to read ACLs (default: nfs4_getfacl).")
                .value_parser(OsStringValueParser::new())
                .global(true),
        )
        .arg(
            Arg::new("setfacl")
                .long("setfacl")
                .value_name("PROGRAM")
                .help("Program used to write ACLs (default: nfs4_setfacl).")
                .value_parser(OsStringValueParser::new())
                .global(true),
        )
        .subcommand(get_command())
        .subcommand(set_command())
        .subcommand(delete_command())
        .subcommand(lock_command())
}
