//! Exit statuses and output of the `prjacl` binary.
//!
//! | Status | Meaning |
//! |--------|---------|
//! | 0 | Success, including "nothing to do" |
//! | 1 | Invalid arguments, settings or role request |
//! | 2 | At least one path or project failed |
//! | 3 | A project was locked by another mutation |

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn prjacl() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_prjacl"));
    command.env_remove("PRJACL_CONFIG").env_remove("PRJACL_LOG");
    command
}

#[cfg(unix)]
fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn help_lists_subcommands() {
    prjacl()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(
            predicate::str::contains("get")
                .and(predicate::str::contains("set"))
                .and(predicate::str::contains("delete"))
                .and(predicate::str::contains("lock")),
        );
}

#[test]
fn version_is_printed() {
    prjacl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("prjacl "));
}

#[test]
fn no_arguments_is_a_usage_error() {
    prjacl().assert().code(1);
}

#[test]
fn overlapping_roles_are_rejected_before_any_tool_runs() {
    let base = tempfile::tempdir().unwrap();
    fs::create_dir(base.path().join("p1")).unwrap();

    prjacl()
        .args(["set", "p1", "-a", "bob", "-u", "bob"])
        .arg("--basedir")
        .arg(base.path())
        .args(["--getfacl", "/nonexistent/getfacl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("user(s) present in multiple roles: bob"));
}

#[test]
fn unknown_role_is_a_usage_error() {
    prjacl()
        .args(["delete", "bob", "p1", "--role", "owner"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no such role: owner"));
}

#[test]
fn settings_file_from_environment_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prjacl.toml");
    fs::write(&config, "basedir = \"/nonexistent/base\"\n").unwrap();

    prjacl()
        .env("PRJACL_CONFIG", &config)
        .args(["lock", "status", "p1"])
        .assert()
        .success()
        .stdout("p1: not locked\n");
}

#[test]
fn invalid_settings_file_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prjacl.toml");
    fs::write(&config, "basedir = [").unwrap();

    prjacl()
        .arg("--config")
        .arg(&config)
        .args(["lock", "status", "p1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid settings file"));
}

#[cfg(unix)]
#[test]
fn held_lock_exits_with_three_and_leaves_marker() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("p1");
    fs::create_dir(&project).unwrap();
    fs::write(project.join(".setacl_lock"), "{}").unwrap();
    let getfacl = script(dir.path(), "getfacl", "exit 0");

    prjacl()
        .args(["set", "p1", "-u", "root", "-l", "2"])
        .arg("--basedir")
        .arg(dir.path())
        .arg("--getfacl")
        .arg(&getfacl)
        .args(["--setfacl", "/nonexistent/setfacl"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("has been acquired by another process"));

    assert_eq!(fs::read_to_string(project.join(".setacl_lock")).unwrap(), "{}");
}

#[cfg(unix)]
#[test]
fn recursive_get_reports_failing_path_and_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("p1");
    fs::create_dir_all(project.join("raw")).unwrap();
    fs::write(project.join("raw/scan.nii"), "x").unwrap();
    let getfacl = script(
        dir.path(),
        "getfacl",
        "case \"$1\" in *scan.nii) echo 'Permission denied' >&2; exit 1;; esac\n\
         echo 'A:fd:bob@dccn.nl:rxntcy'",
    );

    prjacl()
        .args(["get", "p1", "-R"])
        .arg("--basedir")
        .arg(dir.path())
        .arg("--getfacl")
        .arg(&getfacl)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("raw\tuser\tbob"))
        .stderr(predicate::str::contains("scan.nii").and(predicate::str::contains("Permission denied")));
}

#[cfg(unix)]
#[test]
fn verbose_level_shows_info_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("p1")).unwrap();
    let getfacl = script(dir.path(), "getfacl", "echo 'A:fd:root@dccn.nl:rxntcy'");

    prjacl()
        .args(["set", "p1", "-u", "root", "-l", "2"])
        .arg("--basedir")
        .arg(dir.path())
        .arg("--getfacl")
        .arg(&getfacl)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "[WARN:prjacl::role] skip redundant role setting: root -> user",
        ));
}
