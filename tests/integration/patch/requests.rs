//! PatchOp message handling: parsing, ordering and operation limits.

use crate::common::fixtures::*;
use crate::common::init_logging;
use scim_patch::patch::PATCH_OP_SCHEMA;
use scim_patch::{
    Change, EntityVersion, PatchConfig, PatchEngine, PatchOperation, PatchRequest, ScimError,
};
use serde_json::json;

#[test]
fn test_request_applies_operations_in_order() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();

    let request = patch_request(json!([
        {"op": "Add", "path": "members", "value": [{"value": CAROL, "type": "User"}]},
        {"op": "remove", "path": "members[display eq \"alice\"]"},
        {"op": "REPLACE", "path": "displayName", "value": "Ops"},
        {"op": "add", "path": "displayName", "value": "Ops"}
    ]));

    let changes = engine.apply_request(&mut role, &request).unwrap();
    assert_eq!(
        changes,
        vec![
            Change::Modified,
            Change::Modified,
            Change::Modified,
            Change::Unchanged
        ]
    );
    assert_eq!(role.members(), &[member(BOB, "Bob"), member(CAROL, "Carol")]);
    assert_eq!(role.display_name(), Some("Ops"));
}

#[test]
fn test_failed_operation_stops_the_request() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = ops_role();

    let request = patch_request(json!([
        {"op": "replace", "path": "displayName", "value": "Ops"},
        {"op": "remove", "path": "members[value eq 404]"},
        {"op": "replace", "path": "members[value eq 404]", "value": [{"value": EVE}]},
        {"op": "replace", "path": "description", "value": "never applied"}
    ]));

    assert_scim_type!(engine.apply_request(&mut role, &request), "noTarget");
    assert_eq!(role.display_name(), Some("Ops"));
    assert_eq!(role.description, None);
}

#[test]
fn test_unchanged_request_keeps_version() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.tenant_schema(), &directory);
    let mut tenant = acme_tenant();
    let version = EntityVersion::of(&tenant).unwrap();

    let request = patch_request(json!([
        {"op": "add", "path": "roles", "value": [{"value": ALICE, "type": "User", "scope": "read"}]},
        {"op": "remove", "path": "roles[scope eq \"admin\"]"},
        {"op": "replace", "path": "displayName", "value": "Acme"}
    ]));
    let changes = engine.apply_request(&mut tenant, &request).unwrap();

    assert!(changes.iter().all(|change| !change.is_modified()));
    assert_eq!(EntityVersion::of(&tenant).unwrap(), version);
}

#[test]
fn test_operation_limit() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let config = PatchConfig::new().with_max_operations(1);
    let engine = PatchEngine::with_config(registry.group_schema(), &directory, config);
    let mut role = ops_role();

    let request = patch_request(json!([
        {"op": "replace", "path": "displayName", "value": "A"},
        {"op": "replace", "path": "description", "value": "B"}
    ]));
    let result = engine.apply_request(&mut role, &request);
    assert!(matches!(result, Err(ScimError::TooMany { count: 2, limit: 1 })));
    assert_eq!(role, ops_role());
}

#[test]
fn test_malformed_messages() {
    init_logging();
    assert_scim_type!(
        PatchRequest::from_value(json!({"Operations": [{"op": "remove", "path": "title"}]})),
        "invalidSyntax"
    );
    assert_scim_type!(
        PatchRequest::from_value(json!({"schemas": [PATCH_OP_SCHEMA], "Operations": []})),
        "invalidSyntax"
    );
    assert_scim_type!(
        PatchRequest::from_value(json!({
            "schemas": [PATCH_OP_SCHEMA],
            "Operations": [{"op": "move", "path": "title"}]
        })),
        "invalidSyntax"
    );
    assert_scim_type!(
        PatchRequest::from_value(json!({
            "schemas": [PATCH_OP_SCHEMA],
            "Operations": [{"op": "remove", "path": "members[value eq]"}]
        })),
        "invalidPath"
    );
    assert_scim_type!(PatchRequest::from_json_str("{not json"), "invalidSyntax");
}

#[test]
fn test_request_parsed_from_rfc_example() {
    init_logging();
    let request = PatchRequest::from_json_str(
        r#"{
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
            "Operations": [
                {
                    "op": "add",
                    "path": "members",
                    "value": [
                        {"display": "Babs Jensen", "$ref": "https://example.com/v2/Users/2", "value": "2"}
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);
    let mut role = scim_patch::Role::new(10);
    engine.apply_request(&mut role, &request).unwrap();
    assert_eq!(role.members(), &[member(BOB, "Bob")]);
}

#[test]
fn test_deeply_nested_path_is_rejected() {
    init_logging();
    let path = format!(
        "members[{}value eq 1{}]",
        "(".repeat(5_000),
        ")".repeat(5_000)
    );
    assert_scim_type!(
        PatchOperation::from_json(&json!({"op": "remove", "path": path.clone()})),
        "invalidPath"
    );
    assert_scim_type!(
        PatchRequest::from_value(json!({
            "schemas": [PATCH_OP_SCHEMA],
            "Operations": [{"op": "remove", "path": path}]
        })),
        "invalidPath"
    );
}
