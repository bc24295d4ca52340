//! Core type definitions for attribute schema tables.
//!
//! This module contains the descriptors that tell the PATCH engine where an
//! externally visible SCIM attribute lives on an entity and how its values
//! must be shaped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Core SCIM schema URN for users.
pub const USER_SCHEMA_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
/// Enterprise extension URN accepted on user paths.
pub const ENTERPRISE_USER_SCHEMA_URI: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";
/// Core SCIM schema URN for groups, which carry roles.
pub const GROUP_SCHEMA_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
/// Schema URN for tenants.
pub const TENANT_SCHEMA_URI: &str = "urn:p20:scim:schemas:uid:1.0:Tenant";

/// The resource types the engine knows how to patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// A person or service account
    User,
    /// A role, exposed to SCIM clients as a Group
    Group,
    /// A tenant carrying role claims
    Tenant,
}

impl ResourceType {
    /// The SCIM resource type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Group => "Group",
            Self::Tenant => "Tenant",
        }
    }

    /// The core schema URN of this resource type.
    pub fn core_schema_uri(&self) -> &'static str {
        match self {
            Self::User => USER_SCHEMA_URI,
            Self::Group => GROUP_SCHEMA_URI,
            Self::Tenant => TENANT_SCHEMA_URI,
        }
    }

    /// Parse a resource type name case-insensitively. `Role` is accepted as
    /// an alias for `Group`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "user" | "users" => Some(Self::User),
            "group" | "groups" | "role" | "roles" => Some(Self::Group),
            "tenant" | "tenants" => Some(Self::Tenant),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The shape of an attribute's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeKind {
    /// Single string value
    ScalarString,
    /// Single boolean value
    ScalarBool,
    /// Single RFC 3339 dateTime value
    ScalarDate,
    /// Multi-valued member collection
    Collection,
}

impl AttributeKind {
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection)
    }
}

/// Attribute mutability characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Managed by the server (id, meta.*)
    ReadOnly,
    /// Can be modified by clients
    #[default]
    ReadWrite,
}

/// Maps one external attribute name to the entity field that stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    /// Attribute name as SCIM clients write it
    pub external_name: String,
    /// Field key on the entity
    pub internal_key: String,
    /// Value shape
    pub kind: AttributeKind,
    /// Mutability characteristics
    pub mutability: Mutability,
}

impl AttributeDescriptor {
    pub fn new(
        external_name: impl Into<String>,
        internal_key: impl Into<String>,
        kind: AttributeKind,
        mutability: Mutability,
    ) -> Self {
        Self {
            external_name: external_name.into(),
            internal_key: internal_key.into(),
            kind,
            mutability,
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.mutability == Mutability::ReadWrite
    }
}
