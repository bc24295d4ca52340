//! PUT-style merge scenarios.

use crate::common::fixtures::*;
use crate::common::init_logging;
use scim_patch::{EntityMerger, GroupResource, TenantResource, UserResource};
use serde_json::json;

#[test]
fn test_user_merge_overwrites_present_fields_only() {
    init_logging();
    let directory = directory();
    let merger = EntityMerger::new(&directory);
    let user = bjensen();

    let inbound = UserResource::from_json(&json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
        "userName": "babs",
        "active": false,
        "validUntil": "2031-01-01T00:00:00Z"
    }))
    .unwrap();
    let merged = merger.merge(&user, &inbound).unwrap();

    assert_eq!(merged.user_name(), Some("babs"));
    assert_eq!(merged.active, Some(false));
    assert!(merged.valid_until.is_some());
    assert_eq!(merged.display_name, user.display_name);
    assert_eq!(merged.emails(), user.emails());
    assert_eq!(merged.roles(), user.roles());
}

#[test]
fn test_user_emails_replaced_per_type() {
    init_logging();
    let directory = directory();
    let merger = EntityMerger::new(&directory);
    let user = bjensen();

    let inbound = UserResource::from_json(&json!({
        "emails": [
            {"value": "babs@new-home.example", "type": "home"},
            {"value": "babs@other.example", "type": "other"}
        ]
    }))
    .unwrap();
    let merged = merger.merge(&user, &inbound).unwrap();

    assert_eq!(
        merged.emails(),
        &[
            email("bjensen@example.com", "work"),
            email("babs@new-home.example", "home"),
            email("babs@other.example", "other"),
        ]
    );
}

#[test]
fn test_user_roles_replaced_wholesale() {
    init_logging();
    let directory = directory();
    let merger = EntityMerger::new(&directory);

    let inbound = UserResource::from_json(&json!({"roles": [{"value": OPERATORS}]})).unwrap();
    let merged = merger.merge(&bjensen(), &inbound).unwrap();
    assert_eq!(merged.roles().len(), 1);
    assert_eq!(merged.roles()[0].display_name(), Some("Operators"));

    let inbound = UserResource::from_json(&json!({"roles": []})).unwrap();
    assert!(merger.merge(&bjensen(), &inbound).unwrap().roles().is_empty());
}

#[test]
fn test_user_merge_reads_enterprise_extension() {
    init_logging();
    let directory = directory();
    let merger = EntityMerger::new(&directory);

    let inbound = UserResource::from_json(&json!({
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User": {"department": "Finance"}
    }))
    .unwrap();
    let merged = merger.merge(&bjensen(), &inbound).unwrap();
    assert_eq!(merged.department.as_deref(), Some("Finance"));
    assert_eq!(merged.title, bjensen().title);
}

#[test]
fn test_group_merge_with_missing_member_is_not_found() {
    init_logging();
    let directory = directory();
    let merger = EntityMerger::new(&directory);
    let role = ops_role();

    let inbound = GroupResource::from_json(&json!({
        "displayName": "Renamed",
        "members": [{"value": CAROL}, {"value": 404}]
    }))
    .unwrap();
    assert_not_found!(merger.merge(&role, &inbound));
    assert_eq!(role, ops_role());
}

#[test]
fn test_tenant_merge_maps_display_name_and_roles() {
    init_logging();
    let directory = directory();
    let merger = EntityMerger::new(&directory);

    let inbound = TenantResource::from_json(&json!({
        "displayName": "Acme Holdings",
        "roles": [{"value": EVE, "type": "User", "scope": "admin"}]
    }))
    .unwrap();
    let merged = merger.merge(&acme_tenant(), &inbound).unwrap();

    assert_eq!(merged.name(), Some("Acme Holdings"));
    assert_eq!(merged.active, Some(true));
    assert_eq!(merged.claims(), &[claim(EVE, "Eve", "admin")]);
}

#[test]
fn test_tenant_merge_rejects_untyped_claims() {
    init_logging();
    let directory = directory();
    let merger = EntityMerger::new(&directory);

    let inbound = TenantResource::from_json(&json!({"roles": [{"value": EVE}]})).unwrap();
    assert_scim_type!(merger.merge(&acme_tenant(), &inbound), "invalidValue");
}

#[test]
fn test_representation_serializes_only_present_fields() {
    let inbound = GroupResource {
        display_name: Some("Ops".to_string()),
        ..GroupResource::default()
    };
    assert_eq!(
        serde_json::to_value(&inbound).unwrap(),
        json!({"displayName": "Ops"})
    );
}
