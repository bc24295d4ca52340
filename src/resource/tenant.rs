//! Tenant entity.

use super::value_objects::{Meta, TenantClaim};
use super::{
    MemberCollection, ScalarValue, ScimEntity, bool_field, operational_scalar, string_field,
    unknown_field,
};
use crate::error::ScimResult;
use crate::schema::ResourceType;
use serde::{Deserialize, Serialize};

/// A tenant and the scoped claims users hold on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: i64,
    /// Exposed to SCIM clients as `displayName`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Exposed to SCIM clients as `roles`
    #[serde(default)]
    pub claims: Vec<TenantClaim>,
    #[serde(default)]
    pub meta: Meta,
}

impl Tenant {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_claims(mut self, claims: Vec<TenantClaim>) -> Self {
        self.claims = claims;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn claims(&self) -> &[TenantClaim] {
        &self.claims
    }
}

impl ScimEntity for Tenant {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Tenant
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn scalar(&self, key: &str) -> ScimResult<Option<ScalarValue>> {
        match key {
            "name" => Ok(self.name.clone().map(ScalarValue::String)),
            "active" => Ok(self.active.map(ScalarValue::Boolean)),
            _ => operational_scalar(self, &self.meta, key),
        }
    }

    fn set_scalar(&mut self, key: &str, value: Option<ScalarValue>) -> ScimResult<()> {
        match key {
            "name" => self.name = string_field(key, value)?,
            "active" => self.active = bool_field(key, value)?,
            _ => return Err(unknown_field(self.resource_type(), key)),
        }
        Ok(())
    }

    fn collection_mut(&mut self, key: &str) -> ScimResult<&mut dyn MemberCollection> {
        match key {
            "claims" => Ok(&mut self.claims),
            _ => Err(unknown_field(self.resource_type(), key)),
        }
    }
}
