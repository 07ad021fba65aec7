use std::fs;

use guard::CallerContext;
use nfs4::{WriteMode, WriteOptions};
use permissions::Role;
use reconcile::{MutationOutcome, ProjectAcl};
use test_support::{MemoryBackend, ProjectTree, StaticAccounts};

fn project<'a>(
    tree: &ProjectTree,
    backend: &'a MemoryBackend,
) -> ProjectAcl<&'a MemoryBackend, StaticAccounts> {
    backend.observe_marker(tree.base().join(guard::MARKER));
    ProjectAcl::new(
        tree.base(),
        backend,
        StaticAccounts::new(["alice", "bob", "carol"]),
        CallerContext::new("alice", "mentat001"),
    )
}

fn removed_lines(outcome: &MutationOutcome) -> Vec<String> {
    match outcome {
        MutationOutcome::Applied { acl, .. } => acl.iter().map(ToString::to_string).collect(),
        MutationOutcome::NothingToDo => panic!("expected a write"),
    }
}

fn generated_for(user: &str) -> Vec<String> {
    [
        "A:fd:{u}@dccn.nl:rwaDdxnNtTcCoy",
        "A::{u}@dccn.nl:rwadxnNtTcCoy",
        "D:fd:{u}@dccn.nl:Co",
        "A:fd:{u}@dccn.nl:rwaDdxnNtTcy",
        "D::{u}@dccn.nl:Co",
        "A::{u}@dccn.nl:rwadxnNtTcy",
        "D:fd:{u}@dccn.nl:waDdNTCo",
        "A:fd:{u}@dccn.nl:rxntcy",
        "D::{u}@dccn.nl:wadNTCo",
        "A::{u}@dccn.nl:rxntcy",
    ]
    .iter()
    .map(|line| line.replace("{u}", user))
    .collect()
}

#[test]
fn empty_user_list_does_nothing() {
    let tree = ProjectTree::new();
    let backend = MemoryBackend::new();
    let no_users: [&str; 0] = [];

    let outcome = project(&tree, &backend).delete_users(&no_users, None).unwrap();

    assert_eq!(outcome, MutationOutcome::NothingToDo);
    assert!(backend.reads().is_empty());
    assert!(backend.writes().is_empty());
}

#[test]
fn default_roles_remove_generated_and_all_existing_entries() {
    let tree = ProjectTree::new();
    let backend = MemoryBackend::new();
    backend.set_acl_text(
        tree.base(),
        "A:fd:bob@dccn.nl:rxntcy\n\
         A::bob@dccn.nl:x\n\
         A::OWNER@:rwanNtTcCy\n\
         A:fd:carol@dccn.nl:rxntcy",
    );

    let outcome = project(&tree, &backend).delete_users(&["bob"], None).unwrap();

    let mut expected = generated_for("bob");
    expected.push("A::bob@dccn.nl:x".to_owned());
    assert_eq!(removed_lines(&outcome), expected);

    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].path, tree.base());
    assert_eq!(writes[0].options, WriteOptions::recursive(WriteMode::Remove));
    assert_eq!(writes[0].marker_present, Some(true));
    assert!(!tree.base().join(guard::MARKER).exists());

    assert_eq!(
        backend.acl_lines(tree.base()),
        vec!["A::OWNER@:rwanNtTcCy", "A:fd:carol@dccn.nl:rxntcy"]
    );
}

#[test]
fn removal_reaches_nested_paths() {
    let tree = ProjectTree::new();
    let raw = tree.dir("raw");
    let backend = MemoryBackend::new();
    backend.set_acl_text(&raw, "A:fd:bob@dccn.nl:rxntcy\nA:fd:carol@dccn.nl:x");

    project(&tree, &backend).delete_users(&["bob"], None).unwrap();

    assert_eq!(backend.acl_lines(&raw), vec!["A:fd:carol@dccn.nl:x"]);
}

#[test]
fn restricted_roles_only_take_matching_shapes() {
    let tree = ProjectTree::new();
    let backend = MemoryBackend::new();
    backend.set_acl_text(
        tree.base(),
        "A:fd:bob@dccn.nl:rxntcy\n\
         D::bob@dccn.nl:wadNTCo\n\
         A::bob@dccn.nl:x\n\
         A::bob@dccn.nl:rwaDdxnNtTcCoy",
    );

    let outcome = project(&tree, &backend)
        .delete_users(&["bob"], Some(&[Role::User][..]))
        .unwrap();

    assert_eq!(
        removed_lines(&outcome),
        vec![
            "D:fd:bob@dccn.nl:waDdNTCo",
            "A:fd:bob@dccn.nl:rxntcy",
            "D::bob@dccn.nl:wadNTCo",
            "A::bob@dccn.nl:rxntcy",
        ]
    );
    assert_eq!(
        backend.acl_lines(tree.base()),
        vec!["A::bob@dccn.nl:x", "A::bob@dccn.nl:rwaDdxnNtTcCoy"]
    );
}

#[test]
fn empty_role_restriction_means_default_roles() {
    let tree = ProjectTree::new();
    let backend = MemoryBackend::new();

    let outcome = project(&tree, &backend)
        .delete_users(&["bob"], Some(&[][..]))
        .unwrap();

    assert_eq!(removed_lines(&outcome), generated_for("bob"));
}

#[test]
fn removed_accounts_are_not_curated_away() {
    let tree = ProjectTree::new();
    let backend = MemoryBackend::new();
    backend.set_acl_text(tree.base(), "A:fd:ghost@dccn.nl:x");

    let outcome = project(&tree, &backend).delete_users(&["ghost"], None).unwrap();

    let lines = removed_lines(&outcome);
    assert_eq!(lines.len(), 11);
    assert_eq!(lines.last().map(String::as_str), Some("A:fd:ghost@dccn.nl:x"));
    assert!(backend.acl_lines(tree.base()).is_empty());
}

#[test]
fn several_users_are_removed_in_one_call() {
    let tree = ProjectTree::new();
    let backend = MemoryBackend::new();

    let outcome = project(&tree, &backend)
        .delete_users(&["bob", "carol"], None)
        .unwrap();

    let mut expected = generated_for("bob");
    expected.extend(generated_for("carol"));
    assert_eq!(removed_lines(&outcome), expected);
    assert_eq!(backend.writes().len(), 1);
}

#[test]
fn held_lock_blocks_deletion() {
    let tree = ProjectTree::new();
    let backend = MemoryBackend::new();
    backend.set_acl_text(tree.base(), "A:fd:bob@dccn.nl:rxntcy");
    fs::write(tree.base().join(guard::MARKER), "").unwrap();

    let err = project(&tree, &backend)
        .delete_users(&["bob"], None)
        .unwrap_err();

    assert!(err.is_lock_held());
    assert!(backend.writes().is_empty());
    assert_eq!(backend.acl_lines(tree.base()), vec!["A:fd:bob@dccn.nl:rxntcy"]);
}
