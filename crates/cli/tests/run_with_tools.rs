//! Runs the whole front-end against shell scripts standing in for
//! nfs4_getfacl and nfs4_setfacl.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

struct Site {
    dir: TempDir,
    getfacl: PathBuf,
    setfacl: PathBuf,
    log: PathBuf,
}

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

impl Site {
    /// A base directory with project `p1`, a getfacl printing `acl` and a
    /// setfacl logging its arguments and exiting with `setfacl_status`.
    fn new(acl: &str, setfacl_status: i32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("projects/p1")).unwrap();
        let acl_file = dir.path().join("acl.txt");
        fs::write(&acl_file, acl).unwrap();
        let log = dir.path().join("setfacl.log");

        let getfacl = script(
            dir.path(),
            "getfacl",
            &format!("echo \"# file: $1\"; cat '{}'", acl_file.display()),
        );
        let setfacl = script(
            dir.path(),
            "setfacl",
            &format!(
                "printf '%s\\n' \"$@\" > '{}'; echo 'setfacl: denied' >&2; exit {setfacl_status}",
                log.display()
            ),
        );
        Self {
            dir,
            getfacl,
            setfacl,
            log,
        }
    }

    fn project(&self) -> PathBuf {
        self.dir.path().join("projects/p1")
    }

    fn run(&self, args: &[&str]) -> (i32, String, String) {
        let basedir = self.dir.path().join("projects");
        let mut argv: Vec<String> = vec!["prjacl".to_owned()];
        argv.extend(args.iter().map(|arg| (*arg).to_owned()));
        argv.extend([
            "--basedir".to_owned(),
            basedir.display().to_string(),
            "--getfacl".to_owned(),
            self.getfacl.display().to_string(),
            "--setfacl".to_owned(),
            self.setfacl.display().to_string(),
        ]);

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = cli::run(argv, &mut stdout, &mut stderr);
        (
            status,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    fn setfacl_args(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

#[test]
#[serial]
fn get_reports_roles_from_tool_output() {
    let site = Site::new(
        "A:fd:bob@dccn.nl:rxntcy\nA::OWNER@:rwx\nD:fd:carol@dccn.nl:rwaDdxnNtTcCoy\n",
        0,
    );

    let (status, stdout, stderr) = site.run(&["get", "p1"]);
    assert_eq!(status, 0, "{stderr}");
    let project = site.project();
    assert!(stdout.contains(&format!("{}\tuser\tbob\n", project.display())));
    assert!(stdout.contains(&format!("{}\tadmin\t\n", project.display())));
    assert!(!stdout.contains("carol"));
}

#[test]
#[serial]
fn get_json_output() {
    let site = Site::new("A:fd:bob@dccn.nl:x\n", 0);

    let (status, stdout, _) = site.run(&["get", "p1", "--json"]);
    assert_eq!(status, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value[0]["roles"]["traverse"], serde_json::json!(["bob"]));
}

#[test]
#[serial]
fn set_hands_composed_acl_to_setfacl() {
    let site = Site::new("A::OWNER@:rwx\nA:fd:no-such-account-prjacl@dccn.nl:rxntcy\n", 0);

    let (status, _, stderr) = site.run(&["set", "p1", "-u", "root"]);
    assert_eq!(status, 0, "{stderr}");
    assert_eq!(
        site.setfacl_args(),
        vec![
            "-R".to_owned(),
            "-s".to_owned(),
            "A:fd:root@dccn.nl:rxntcy,A:fd:OWNER@:rwx".to_owned(),
            format!("{}/", site.project().display()),
        ]
    );
    assert!(!site.project().join(".setacl_lock").exists());
}

#[test]
#[serial]
fn set_failure_releases_lock_and_reports_stderr() {
    let site = Site::new("", 1);

    let (status, _, stderr) = site.run(&["set", "p1", "-a", "root", "--no-recursive"]);
    assert_eq!(status, 2);
    assert!(stderr.contains("setfacl: denied"));
    assert_eq!(site.setfacl_args()[0], "-s");
    assert!(!site.project().join(".setacl_lock").exists());
}

#[test]
#[serial]
fn set_refused_while_locked() {
    let site = Site::new("", 0);
    fs::write(site.project().join(".setacl_lock"), "{}").unwrap();

    let (status, _, stderr) = site.run(&["set", "p1", "-u", "root"]);
    assert_eq!(status, 3);
    assert!(stderr.contains("has been acquired by another process"));
    assert!(!site.log.exists());
}

#[test]
#[serial]
fn delete_removes_recursively() {
    let site = Site::new("A:fd:bob@dccn.nl:rxntcy\n", 0);

    let (status, _, stderr) = site.run(&["delete", "bob", "p1", "--role", "user"]);
    assert_eq!(status, 0, "{stderr}");
    let args = site.setfacl_args();
    assert_eq!(&args[..2], ["-R", "-x"]);
    assert_eq!(
        args[2],
        "D:fd:bob@dccn.nl:waDdNTCo,A:fd:bob@dccn.nl:rxntcy,D::bob@dccn.nl:wadNTCo,A::bob@dccn.nl:rxntcy"
    );
}

#[test]
#[serial]
fn lock_status_reports_unreadable_record() {
    let site = Site::new("", 0);
    fs::write(site.project().join(".setacl_lock"), "garbage").unwrap();

    let (status, stdout, _) = site.run(&["lock", "status", "p1"]);
    assert_eq!(status, 0);
    assert!(stdout.starts_with("p1: locked, no readable record"));

    let (status, stdout, _) = site.run(&["lock", "clear", "p1"]);
    assert_eq!(status, 0);
    assert_eq!(stdout, "p1: lock removed\n");
}

#[test]
#[serial]
fn config_file_supplies_domain() {
    let site = Site::new("", 0);
    let config = site.dir.path().join("prjacl.toml");
    fs::write(&config, "domain = \"example.org\"\n").unwrap();

    let config_arg = config.display().to_string();
    let (status, _, stderr) = site.run(&["--config", &config_arg, "set", "p1", "-t", "root"]);
    assert_eq!(status, 0, "{stderr}");
    assert_eq!(site.setfacl_args()[2], "A:fd:root@example.org:x");
}
