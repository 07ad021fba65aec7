//! Integration tests for the role/permission algebra.
//!
//! These cover the properties every caller relies on: allow and deny masks
//! partition the alphabet, inference inverts expansion, and role names are
//! stable in serialised reports.

use permissions::{
    Permission, PermissionSet, Role, infer_role, permissions_for, permissions_for_name,
};

#[test]
fn allow_and_deny_partition_the_alphabet_for_every_role() {
    for role in Role::ALL {
        let mask = permissions_for(role);
        assert_eq!(mask.allow | mask.deny, PermissionSet::FULL, "{role}");
        assert!((mask.allow & mask.deny).is_empty(), "{role}");
    }
}

#[test]
fn inference_inverts_expansion() {
    for role in Role::ALL {
        assert_eq!(infer_role(permissions_for(role).allow), role);
    }
}

#[test]
fn role_masks_are_pairwise_distinct() {
    for a in Role::ALL {
        for b in Role::ALL {
            if a != b {
                assert_ne!(permissions_for(a).allow, permissions_for(b).allow);
            }
        }
    }
}

#[test]
fn privileges_shrink_down_the_role_list() {
    let sizes: Vec<u32> = Role::ALL
        .iter()
        .map(|role| permissions_for(*role).allow.len())
        .collect();
    assert_eq!(sizes, vec![14, 12, 6, 1]);
}

#[test]
fn only_admin_may_write_acl_or_change_owner() {
    for role in Role::ALL {
        let allow = permissions_for(role).allow;
        let expected = role == Role::Admin;
        assert_eq!(allow.contains(Permission::WriteAcl), expected, "{role}");
        assert_eq!(allow.contains(Permission::WriteOwner), expected, "{role}");
    }
}

#[test]
fn unknown_role_name_is_rejected() {
    let error = permissions_for_name("superuser").expect_err("unknown role");
    assert_eq!(error.to_string(), "no such role: superuser");
}

#[test]
fn roles_serialise_as_lowercase_names() {
    let json = serde_json::to_string(&Role::ALL).expect("serialise");
    assert_eq!(json, r#"["admin","contributor","user","traverse"]"#);
    let back: Vec<Role> = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(back, Role::ALL.to_vec());
}
