//! Shared test data: a principal directory and sample entities.

use scim_patch::patch::PATCH_OP_SCHEMA;
use scim_patch::resource::value_objects::{EmailAddress, GroupMember, RoleAssignment, TenantClaim};
use scim_patch::{InMemoryDirectory, PatchRequest, Principal, Role, SchemaRegistry, Tenant, User};
use serde_json::{Value, json};

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;
pub const CAROL: i64 = 3;
pub const EVE: i64 = 5;
pub const AUDITORS: i64 = 70;
pub const OPERATORS: i64 = 71;

pub fn registry() -> SchemaRegistry {
    SchemaRegistry::new().expect("built-in schemas are valid")
}

/// Users 1, 2, 3 and 5 and roles 70 and 71.
pub fn directory() -> InMemoryDirectory {
    InMemoryDirectory::with_principals([
        Principal::user(ALICE, "Alice"),
        Principal::user(BOB, "Bob"),
        Principal::user(CAROL, "Carol"),
        Principal::user(EVE, "Eve"),
        Principal::role(AUDITORS, "Auditors"),
        Principal::role(OPERATORS, "Operators"),
    ])
}

pub fn member(id: i64, name: &str) -> GroupMember {
    GroupMember::new(id, Some(name.to_string()))
}

pub fn claim(id: i64, name: &str, scope: &str) -> TenantClaim {
    TenantClaim::new(id, Some(name.to_string()), Some(scope.to_string()))
}

pub fn email(address: &str, email_type: &str) -> EmailAddress {
    EmailAddress::new(address, Some(email_type)).expect("valid test address")
}

/// Role 10 with Alice and Bob as members.
pub fn ops_role() -> Role {
    Role::new(10)
        .with_display_name("Operations")
        .with_members(vec![member(ALICE, "Alice"), member(BOB, "Bob")])
}

/// Tenant 20 with a read claim for Alice and a write claim for Bob.
pub fn acme_tenant() -> Tenant {
    Tenant::new(20)
        .with_name("Acme")
        .with_active(true)
        .with_claims(vec![claim(ALICE, "Alice", "read"), claim(BOB, "Bob", "write")])
}

/// User 1 with a work and a home email and the Auditors role.
pub fn bjensen() -> User {
    User::new(ALICE, "bjensen")
        .with_display_name("Babs Jensen")
        .with_active(true)
        .with_emails(vec![
            email("bjensen@example.com", "work"),
            email("babs@home.example", "home"),
        ])
        .with_roles(vec![RoleAssignment::new(AUDITORS, Some("Auditors".to_string()))])
}

/// Wrap operations in a PatchOp message and parse it.
pub fn patch_request(operations: Value) -> PatchRequest {
    PatchRequest::from_value(json!({
        "schemas": [PATCH_OP_SCHEMA],
        "Operations": operations,
    }))
    .expect("valid PatchOp message")
}
