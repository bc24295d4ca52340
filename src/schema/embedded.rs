//! Built-in attribute tables.
//!
//! These tables describe the governance resource types the engine ships with.
//! They are built eagerly and shared by reference through
//! [`SchemaRegistry`](super::SchemaRegistry).

use super::table::{AttributeSchema, AttributeSchemaBuilder};
use super::types::{AttributeKind, ENTERPRISE_USER_SCHEMA_URI, ResourceType};
use crate::error::BuildResult;

use AttributeKind::{Collection, ScalarBool, ScalarDate, ScalarString};

/// id and meta.* are server managed on every resource type.
fn with_operational_attributes(builder: AttributeSchemaBuilder) -> AttributeSchemaBuilder {
    builder
        .operational("id", "id", ScalarString)
        .operational("meta.created", "created", ScalarDate)
        .operational("meta.lastModified", "lastModified", ScalarDate)
        .operational("meta.resourceType", "resourceType", ScalarString)
        .operational("meta.location", "location", ScalarString)
        .operational("meta.version", "version", ScalarString)
}

/// Attribute table for users.
pub fn user_schema() -> BuildResult<AttributeSchema> {
    with_operational_attributes(
        AttributeSchema::builder(ResourceType::User)
            .schema_uri(ResourceType::User.core_schema_uri()),
    )
    .mutable("userName", "userName", ScalarString)
    .mutable("displayName", "displayName", ScalarString)
    .mutable("nickName", "nickName", ScalarString)
    .mutable("title", "title", ScalarString)
    .mutable("active", "active", ScalarBool)
    .mutable("validFrom", "validFrom", ScalarDate)
    .mutable("validUntil", "validUntil", ScalarDate)
    .mutable("emails", "emails", Collection)
    .mutable("roles", "roles", Collection)
    .searchable("emails.value", "emails.value")
    .searchable("emails.type", "emails.type")
    .searchable("roles.value", "roles.value")
    .extension(ENTERPRISE_USER_SCHEMA_URI)
    .mutable("department", "department", ScalarString)
    .build()
}

/// Attribute table for roles, exposed as SCIM groups.
pub fn group_schema() -> BuildResult<AttributeSchema> {
    with_operational_attributes(
        AttributeSchema::builder(ResourceType::Group)
            .schema_uri(ResourceType::Group.core_schema_uri()),
    )
    .mutable("displayName", "displayName", ScalarString)
    .mutable("description", "description", ScalarString)
    .mutable("members", "members", Collection)
    .searchable("members.value", "members.value")
    .searchable("members.display", "members.display")
    .build()
}

/// Attribute table for tenants. Tenant role claims are exposed as `roles`.
pub fn tenant_schema() -> BuildResult<AttributeSchema> {
    with_operational_attributes(
        AttributeSchema::builder(ResourceType::Tenant)
            .schema_uri(ResourceType::Tenant.core_schema_uri()),
    )
    .mutable("displayName", "name", ScalarString)
    .mutable("active", "active", ScalarBool)
    .mutable("roles", "claims", Collection)
    .searchable("roles.value", "claims.value")
    .searchable("roles.scope", "claims.scope")
    .build()
}
