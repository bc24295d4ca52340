//! `add` operation scenarios (RFC 7644 §3.5.2.1).

use crate::common::fixtures::*;
use crate::common::init_logging;
use scim_patch::{
    Change, EntityVersion, PatchEngine, PatchOperation, PrincipalKind, Role, Tenant, User,
};
use serde_json::json;

#[test]
fn test_add_display_name_to_role_without_one() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = Role::new(10);

    let op = PatchOperation::add("displayName", "Ops Team").unwrap();
    assert_eq!(engine.apply(&mut role, &op).unwrap(), Change::Modified);
    assert_eq!(role.display_name(), Some("Ops Team"));
}

#[test]
fn test_identical_scalar_add_is_idempotent() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();

    let op = PatchOperation::add("description", "Keeps the lights on").unwrap();
    engine.apply(&mut role, &op).unwrap();
    let version = EntityVersion::of(&role).unwrap();

    assert_eq!(engine.apply(&mut role, &op).unwrap(), Change::Unchanged);
    assert_eq!(EntityVersion::of(&role).unwrap(), version);
}

#[test]
fn test_attribute_names_are_case_insensitive() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.tenant_schema(), &directory);

    for path in ["displayName", "DISPLAYNAME", "DisplayName", "displayname"] {
        let mut tenant = Tenant::new(20);
        let op = PatchOperation::add(path, "Acme").unwrap();
        engine.apply(&mut tenant, &op).unwrap();
        assert_eq!(tenant.name(), Some("Acme"), "path {}", path);
    }
}

#[test]
fn test_add_member_with_missing_principal_is_not_found() {
    init_logging();
    let registry = registry();
    let directory = directory();
    directory.remove(PrincipalKind::User, EVE).unwrap();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();
    let before = role.clone();

    let op = PatchOperation::add("members", json!([{"value": EVE, "type": "User"}])).unwrap();
    assert_not_found!(engine.apply(&mut role, &op));
    assert_eq!(role, before);
}

#[test]
fn test_add_members_appends_new_principals_in_order() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();

    let op = PatchOperation::add(
        "members",
        json!([
            {"value": EVE, "type": "User"},
            {"value": ALICE},
            {"value": CAROL, "display": "Not Carol"}
        ]),
    )
    .unwrap();
    assert_eq!(engine.apply(&mut role, &op).unwrap(), Change::Modified);
    assert_eq!(
        role.members(),
        &[
            member(ALICE, "Alice"),
            member(BOB, "Bob"),
            member(EVE, "Eve"),
            member(CAROL, "Carol"),
        ]
    );
}

#[test]
fn test_add_member_of_wrong_type_is_invalid_value() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();

    let op =
        PatchOperation::add("members", json!([{"value": AUDITORS, "type": "Group"}])).unwrap();
    assert_scim_type!(engine.apply(&mut role, &op), "invalidValue");
    assert_eq!(role, ops_role());
}

#[test]
fn test_add_tenant_claim_requires_user_type() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.tenant_schema(), &directory);
    let mut tenant = acme_tenant();

    let op = PatchOperation::add("roles", json!([{"value": CAROL, "scope": "read"}])).unwrap();
    assert_scim_type!(engine.apply(&mut tenant, &op), "invalidValue");

    let op = PatchOperation::add(
        "roles",
        json!([{"value": ALICE, "type": "User", "scope": "write"}]),
    )
    .unwrap();
    assert_eq!(engine.apply(&mut tenant, &op).unwrap(), Change::Modified);
    assert_eq!(tenant.claims().len(), 3);
    assert_eq!(tenant.claims()[2], claim(ALICE, "Alice", "write"));
}

#[test]
fn test_add_user_roles_resolves_role_principals() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.user_schema(), &directory);
    let mut user = bjensen();

    let op = PatchOperation::add("roles", json!([{"value": OPERATORS, "primary": true}])).unwrap();
    engine.apply(&mut user, &op).unwrap();
    assert_eq!(user.roles()[1].display_name(), Some("Operators"));
    assert!(user.roles()[1].is_primary());

    // A user id is not a role
    let op = PatchOperation::add("roles", json!([{"value": BOB}])).unwrap();
    assert_not_found!(engine.apply(&mut user, &op));
}

#[test]
fn test_add_email_deduplicates_by_address_and_type() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.user_schema(), &directory);
    let mut user = bjensen();

    let op = PatchOperation::add(
        "emails",
        json!([{"value": "BJensen@Example.com", "type": "Work"}]),
    )
    .unwrap();
    assert_eq!(engine.apply(&mut user, &op).unwrap(), Change::Unchanged);
    assert_eq!(user.emails().len(), 2);
}

#[test]
fn test_add_rejects_read_only_and_unknown_attributes() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.user_schema(), &directory);
    let mut user = User::new(ALICE, "bjensen");

    for path in ["id", "meta.created", "meta.version", "name.givenName", "password"] {
        let op = PatchOperation::add(path, "x").unwrap();
        assert_scim_type!(engine.apply(&mut user, &op), "invalidPath");
    }
    assert_eq!(user, User::new(ALICE, "bjensen"));
}

#[test]
fn test_add_sub_attribute_of_collection_is_invalid_path() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.user_schema(), &directory);
    let mut user = bjensen();

    let op = PatchOperation::add(r#"emails[type eq "work"].value"#, "new@example.com").unwrap();
    assert_scim_type!(engine.apply(&mut user, &op), "invalidPath");
}

#[test]
fn test_add_with_extension_urn_prefix() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.user_schema(), &directory);
    let mut user = bjensen();

    let op = PatchOperation::add(
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department",
        "Finance",
    )
    .unwrap();
    engine.apply(&mut user, &op).unwrap();
    assert_eq!(user.department.as_deref(), Some("Finance"));

    let op = PatchOperation::add("urn:example:unknown:2.0:User:title", "CFO").unwrap();
    assert_scim_type!(engine.apply(&mut user, &op), "invalidPath");

    let op = PatchOperation::add(
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:userName",
        "babs",
    )
    .unwrap();
    assert_scim_type!(engine.apply(&mut user, &op), "invalidPath");
    assert_eq!(user.user_name(), Some("bjensen"));
}
