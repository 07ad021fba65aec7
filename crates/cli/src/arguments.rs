//! crates/cli/src/arguments.rs
//!
//! Typed view of a parsed `prjacl` command line.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::ArgMatches;
use permissions::Role;
use reconcile::RoleAssignment;

use crate::command::clap_command;

/// Options accepted by every subcommand. `None` means "not given".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// `-l/--loglevel`.
    pub loglevel: Option<u8>,
    /// `-d/--basedir`.
    pub basedir: Option<PathBuf>,
    /// `--domain`.
    pub domain: Option<String>,
    /// `--config`.
    pub config: Option<PathBuf>,
    /// `--getfacl`.
    pub getfacl: Option<OsString>,
    /// `--setfacl`.
    pub setfacl: Option<OsString>,
}

/// What to do with the lock of a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockAction {
    /// Report the lock holder.
    Status {
        /// Print JSON instead of text.
        json: bool,
    },
    /// Remove the marker.
    Clear,
}

/// The requested subcommand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// `prjacl get`.
    Get {
        /// Project id.
        project: String,
        /// Path inside the project.
        path: PathBuf,
        /// Descend into the path.
        recursive: bool,
        /// Print JSON instead of text.
        json: bool,
    },
    /// `prjacl set`.
    Set {
        /// Project id.
        project: String,
        /// Path inside the project.
        path: PathBuf,
        /// Requested users per role.
        assignment: RoleAssignment,
        /// Apply to the path's contents too.
        recursive: bool,
        /// Skip the redundancy check.
        force: bool,
    },
    /// `prjacl delete`.
    Delete {
        /// Users to remove.
        users: Vec<String>,
        /// Projects to remove them from.
        projects: Vec<String>,
        /// Roles whose entries are removed; empty for the default set.
        roles: Vec<Role>,
    },
    /// `prjacl lock status|clear`.
    Lock {
        /// Project id.
        project: String,
        /// Operation on the lock.
        action: LockAction,
    },
}

/// Parsed command produced by [`parse_args`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Options shared by all subcommands.
    pub global: GlobalArgs,
    /// The subcommand.
    pub action: Action,
}

/// Splits a comma-separated user list, dropping blanks.
pub fn csv_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn project(matches: &mut ArgMatches) -> String {
    matches.remove_one::<String>("project").unwrap_or_default()
}

fn path(matches: &mut ArgMatches) -> PathBuf {
    matches.remove_one::<PathBuf>("path").unwrap_or_default()
}

fn parse_action(name: &str, mut matches: ArgMatches) -> Action {
    match name {
        "get" => Action::Get {
            project: project(&mut matches),
            path: path(&mut matches),
            recursive: matches.get_flag("recursive"),
            json: matches.get_flag("json"),
        },
        "set" => {
            let mut assignment = RoleAssignment::new();
            for role in Role::ALL {
                if let Some(users) = matches.remove_one::<String>(role.name()) {
                    assignment = assignment.assign(role, csv_list(&users));
                }
            }
            Action::Set {
                project: project(&mut matches),
                path: path(&mut matches),
                assignment,
                recursive: !matches.get_flag("no-recursive"),
                force: matches.get_flag("force"),
            }
        }
        "delete" => Action::Delete {
            users: matches
                .remove_one::<String>("users")
                .map(|users| csv_list(&users))
                .unwrap_or_default(),
            projects: matches
                .remove_many::<String>("projects")
                .map(Iterator::collect)
                .unwrap_or_default(),
            roles: matches
                .remove_many::<Role>("role")
                .map(Iterator::collect)
                .unwrap_or_default(),
        },
        _ => {
            let (lock_name, mut lock_matches) = matches
                .remove_subcommand()
                .unwrap_or_else(|| ("status".to_owned(), ArgMatches::default()));
            let action = if lock_name == "clear" {
                LockAction::Clear
            } else {
                LockAction::Status {
                    json: lock_matches.get_flag("json"),
                }
            };
            Action::Lock {
                project: project(&mut lock_matches),
                action,
            }
        }
    }
}

/// Parses `arguments`, the first of which is the program name.
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let mut matches = clap_command().try_get_matches_from(arguments)?;
    let (name, sub_matches) = matches.remove_subcommand().ok_or_else(|| {
        clap_command().error(
            clap::error::ErrorKind::MissingSubcommand,
            "a subcommand is required",
        )
    })?;

    Ok(ParsedArgs {
        global: global_args(innermost(&sub_matches)),
        action: parse_action(&name, sub_matches),
    })
}

/// Global options are propagated down, so the deepest matches see them all.
fn innermost(matches: &ArgMatches) -> &ArgMatches {
    match matches.subcommand() {
        Some((_, sub)) => innermost(sub),
        None => matches,
    }
}

fn global_args(matches: &ArgMatches) -> GlobalArgs {
    GlobalArgs {
        loglevel: matches.get_one::<u8>("loglevel").copied(),
        basedir: matches.get_one::<PathBuf>("basedir").cloned(),
        domain: matches.get_one::<String>("domain").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        getfacl: matches.get_one::<OsString>("getfacl").cloned(),
        setfacl: matches.get_one::<OsString>("setfacl").cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_list_trims_and_drops_blanks() {
        assert_eq!(csv_list(" alice, bob,,carol ,"), vec!["alice", "bob", "carol"]);
        assert!(csv_list("").is_empty());
    }

    #[test]
    fn get_defaults() {
        let parsed = parse_args(["prjacl", "get", "3010000.01"]).unwrap();
        assert_eq!(parsed.global, GlobalArgs::default());
        assert_eq!(
            parsed.action,
            Action::Get {
                project: "3010000.01".to_owned(),
                path: PathBuf::new(),
                recursive: false,
                json: false,
            }
        );
    }

    #[test]
    fn global_options_after_subcommand() {
        let parsed = parse_args([
            "prjacl", "get", "p1", "-R", "--json", "-l", "3", "-d", "/data", "--domain",
            "example.org",
        ])
        .unwrap();
        assert_eq!(parsed.global.loglevel, Some(3));
        assert_eq!(parsed.global.basedir, Some(PathBuf::from("/data")));
        assert_eq!(parsed.global.domain.as_deref(), Some("example.org"));
        assert!(matches!(
            parsed.action,
            Action::Get {
                recursive: true,
                json: true,
                ..
            }
        ));
    }

    #[test]
    fn set_collects_role_lists() {
        let parsed = parse_args([
            "prjacl", "set", "p1", "-a", "alice", "-u", "bob,carol", "--path", "raw",
            "--no-recursive",
        ])
        .unwrap();
        let expected = RoleAssignment::new()
            .assign(Role::Admin, ["alice"])
            .assign(Role::User, ["bob", "carol"]);
        assert_eq!(
            parsed.action,
            Action::Set {
                project: "p1".to_owned(),
                path: PathBuf::from("raw"),
                assignment: expected,
                recursive: false,
                force: false,
            }
        );
    }

    #[test]
    fn delete_takes_several_projects_and_roles() {
        let parsed = parse_args([
            "prjacl", "delete", "bob,carol", "p1", "p2", "--role", "admin", "-r", "USER",
        ])
        .unwrap();
        assert_eq!(
            parsed.action,
            Action::Delete {
                users: vec!["bob".to_owned(), "carol".to_owned()],
                projects: vec!["p1".to_owned(), "p2".to_owned()],
                roles: vec![Role::Admin, Role::User],
            }
        );
    }

    #[test]
    fn unknown_role_is_a_usage_error() {
        let err = parse_args(["prjacl", "delete", "bob", "p1", "--role", "owner"]).unwrap_err();
        assert!(err.to_string().contains("no such role: owner"));
    }

    #[test]
    fn loglevel_out_of_range_is_rejected() {
        assert!(parse_args(["prjacl", "-l", "4", "get", "p1"]).is_err());
    }

    #[test]
    fn lock_subcommands() {
        let status = parse_args(["prjacl", "lock", "status", "p1", "--json"]).unwrap();
        assert_eq!(
            status.action,
            Action::Lock {
                project: "p1".to_owned(),
                action: LockAction::Status { json: true },
            }
        );
        let clear = parse_args(["prjacl", "lock", "clear", "p1"]).unwrap();
        assert_eq!(
            clear.action,
            Action::Lock {
                project: "p1".to_owned(),
                action: LockAction::Clear,
            }
        );
    }

    #[test]
    fn absolute_path_is_refused() {
        assert!(parse_args(["prjacl", "get", "p1", "--path", "/etc"]).is_err());
    }

    #[test]
    fn paths_escaping_the_project_are_refused() {
        assert!(parse_args(["prjacl", "set", "p1", "-u", "bob", "--path", "../../etc"]).is_err());
        assert!(parse_args(["prjacl", "set", "/etc", "-u", "bob"]).is_err());
        assert!(parse_args(["prjacl", "get", ".."]).is_err());
        assert!(parse_args(["prjacl", "delete", "bob", "p1", "/etc"]).is_err());
        assert!(parse_args(["prjacl", "lock", "clear", "../p1"]).is_err());
        assert!(parse_args(["prjacl", "set", "p1", "-u", "bob", "--path", "raw/sub"]).is_ok());
    }
}
