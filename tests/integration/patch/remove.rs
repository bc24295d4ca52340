//! `remove` operation scenarios (RFC 7644 §3.5.2.2).

use crate::common::fixtures::*;
use crate::common::init_logging;
use scim_patch::filter::{Filter, FilterEvaluator};
use scim_patch::{Change, PatchEngine, PatchOpType, PatchOperation, Tenant};

#[test]
fn test_remove_without_path_is_no_target() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();

    let op = PatchOperation::new(PatchOpType::Remove, None, None);
    assert_scim_type!(engine.apply(&mut role, &op), "noTarget");
    assert_eq!(role, ops_role());
}

#[test]
fn test_remove_claim_by_value() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.tenant_schema(), &directory);
    let mut tenant = acme_tenant();

    let op = PatchOperation::remove("roles[value eq 1]").unwrap();
    assert_eq!(engine.apply(&mut tenant, &op).unwrap(), Change::Modified);
    assert_eq!(tenant.claims(), &[claim(BOB, "Bob", "write")]);
}

#[test]
fn test_remove_removes_exactly_the_matching_members() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.tenant_schema(), &directory);
    let claims = vec![
        claim(ALICE, "Alice", "read"),
        claim(BOB, "Bob", "write"),
        claim(CAROL, "Carol", "read"),
        claim(EVE, "Eve", "admin"),
        claim(ALICE, "Alice", "write"),
    ];
    let mut tenant = Tenant::new(20).with_claims(claims.clone());

    let expression = r#"scope eq "read" or (value gt 2 and display sw "e")"#;
    let filter = Filter::parse(expression).unwrap();
    let evaluator = FilterEvaluator::new();
    let expected: Vec<_> = claims
        .iter()
        .filter(|c| !evaluator.evaluate(&filter, *c).unwrap())
        .cloned()
        .collect();

    let op = PatchOperation::remove(&format!("roles[{}]", expression)).unwrap();
    engine.apply(&mut tenant, &op).unwrap();
    assert_eq!(tenant.claims(), expected.as_slice());
    assert_eq!(
        tenant.claims(),
        &[claim(BOB, "Bob", "write"), claim(ALICE, "Alice", "write")]
    );
}

#[test]
fn test_remove_without_filter_clears_collection() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();

    let op = PatchOperation::remove("members").unwrap();
    assert_eq!(engine.apply(&mut role, &op).unwrap(), Change::Modified);
    assert!(role.members().is_empty());

    // The emptied collection serializes as an empty array, not null
    let json = serde_json::to_value(&role).unwrap();
    assert_eq!(json["members"], serde_json::json!([]));
}

#[test]
fn test_remove_with_unmatched_filter_is_unchanged() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();

    let op = PatchOperation::remove("members[value eq 404]").unwrap();
    assert_eq!(engine.apply(&mut role, &op).unwrap(), Change::Unchanged);
    assert_eq!(role, ops_role());
}

#[test]
fn test_invalid_filter_leaves_members_untouched() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();

    for path in [
        r#"members[value co "1"]"#,
        "members[value gt true]",
        "members[display gt 5]",
        r#"members[emails[type eq "work"]]"#,
    ] {
        let op = PatchOperation::remove(path).unwrap();
        assert_scim_type!(engine.apply(&mut role, &op), "invalidFilter");
        assert_eq!(role, ops_role(), "path {}", path);
    }
}

#[test]
fn test_remove_scalar_unassigns_it() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.user_schema(), &directory);
    let mut user = bjensen();

    let op = PatchOperation::remove("displayName").unwrap();
    assert_eq!(engine.apply(&mut user, &op).unwrap(), Change::Modified);
    assert_eq!(user.display_name, None);
    assert_eq!(engine.apply(&mut user, &op).unwrap(), Change::Unchanged);
}

#[test]
fn test_remove_email_by_type() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.user_schema(), &directory);
    let mut user = bjensen();

    let op = PatchOperation::remove(r#"emails[type eq "WORK"]"#).unwrap();
    engine.apply(&mut user, &op).unwrap();
    assert_eq!(user.emails(), &[email("babs@home.example", "home")]);
}

#[test]
fn test_remove_read_only_attribute_is_invalid_path() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.tenant_schema(), &directory);
    let mut tenant = acme_tenant();

    for path in ["id", "meta.lastModified"] {
        let op = PatchOperation::remove(path).unwrap();
        assert_scim_type!(engine.apply(&mut tenant, &op), "invalidPath");
    }
    assert_eq!(tenant, acme_tenant());
}
