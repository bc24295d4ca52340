//! Registry bundling the built-in attribute tables.

use super::embedded;
use super::table::AttributeSchema;
use super::types::ResourceType;
use crate::error::BuildResult;

/// The attribute tables of every built-in resource type.
///
/// The registry is built once at startup and passed by reference to the
/// engines that need it. It is `Send + Sync` and never mutated.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    user: AttributeSchema,
    group: AttributeSchema,
    tenant: AttributeSchema,
}

impl SchemaRegistry {
    /// Build the registry from the embedded tables.
    pub fn new() -> BuildResult<Self> {
        Ok(Self {
            user: embedded::user_schema()?,
            group: embedded::group_schema()?,
            tenant: embedded::tenant_schema()?,
        })
    }

    /// Get the table for a resource type.
    pub fn get(&self, resource_type: ResourceType) -> &AttributeSchema {
        match resource_type {
            ResourceType::User => &self.user,
            ResourceType::Group => &self.group,
            ResourceType::Tenant => &self.tenant,
        }
    }

    /// Look up a table by resource type name, e.g. `"Group"` or `"role"`.
    pub fn get_by_name(&self, name: &str) -> Option<&AttributeSchema> {
        ResourceType::from_name(name).map(|resource_type| self.get(resource_type))
    }

    pub fn user_schema(&self) -> &AttributeSchema {
        &self.user
    }

    pub fn group_schema(&self) -> &AttributeSchema {
        &self.group
    }

    pub fn tenant_schema(&self) -> &AttributeSchema {
        &self.tenant
    }
}
