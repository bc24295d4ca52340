//! RFC 7644 §3.12 error responses produced by failing operations.

use crate::common::fixtures::*;
use crate::common::init_logging;
use scim_patch::{PatchEngine, PatchOpType, PatchOperation, ScimError};
use serde_json::json;

#[test]
fn test_error_kinds_map_to_scim_types_and_statuses() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.group_schema(), &directory);

    let cases: Vec<(PatchOperation, Option<&str>, u16)> = vec![
        (PatchOperation::replace("id", "7").unwrap(), Some("invalidPath"), 400),
        (
            PatchOperation::add("members", json!("not an array")).unwrap(),
            Some("invalidValue"),
            400,
        ),
        (
            PatchOperation::remove(r#"members[value sw "1"]"#).unwrap(),
            Some("invalidFilter"),
            400,
        ),
        (
            PatchOperation::new(PatchOpType::Remove, None, None),
            Some("noTarget"),
            400,
        ),
        (
            PatchOperation::add("members", json!([{"value": 404}])).unwrap(),
            None,
            404,
        ),
    ];

    for (op, scim_type, status) in cases {
        let mut role = ops_role();
        let error = engine.apply(&mut role, &op).unwrap_err();
        assert_eq!(error.scim_type(), scim_type, "{}", op);
        assert_eq!(error.status_code(), status, "{}", op);
        assert_eq!(role, ops_role(), "{} must not modify the role", op);
    }
}

#[test]
fn test_error_response_body() {
    init_logging();
    let registry = registry();
    let directory = directory();
    let engine = PatchEngine::new(registry.tenant_schema(), &directory);
    let mut tenant = acme_tenant();

    let error = engine
        .apply(&mut tenant, &PatchOperation::remove("meta.created").unwrap())
        .unwrap_err();
    let body = error.to_response();

    assert_eq!(
        body["schemas"],
        json!(["urn:ietf:params:scim:api:messages:2.0:Error"])
    );
    assert_eq!(body["status"], "400");
    assert_eq!(body["scimType"], "invalidPath");
    assert!(body["detail"].as_str().unwrap().contains("meta.created"));
}

#[test]
fn test_not_found_response_has_no_scim_type() {
    init_logging();
    let error = ScimError::not_found("User", 404);
    let body = error.to_response();
    assert_eq!(body["status"], "404");
    assert!(body.get("scimType").is_none());
    assert!(error.is_client_error());
}
