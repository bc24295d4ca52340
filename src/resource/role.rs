//! Role entity, exposed to SCIM clients as a Group.

use super::value_objects::{GroupMember, Meta};
use super::{
    MemberCollection, ScalarValue, ScimEntity, operational_scalar, string_field, unknown_field,
};
use crate::error::ScimResult;
use crate::schema::ResourceType;
use serde::{Deserialize, Serialize};

/// A role and the users that hold it.
///
/// # Examples
///
/// ```rust
/// use scim_patch::resource::Role;
/// use scim_patch::resource::value_objects::GroupMember;
///
/// let role = Role::new(10)
///     .with_display_name("Ops Team")
///     .with_members(vec![GroupMember::new(5, Some("Eve".to_string()))]);
/// assert_eq!(role.display_name(), Some("Ops Team"));
/// assert_eq!(role.members().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub meta: Meta,
}

impl Role {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_members(mut self, members: Vec<GroupMember>) -> Self {
        self.members = members;
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }
}

impl ScimEntity for Role {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Group
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn scalar(&self, key: &str) -> ScimResult<Option<ScalarValue>> {
        match key {
            "displayName" => Ok(self.display_name.clone().map(ScalarValue::String)),
            "description" => Ok(self.description.clone().map(ScalarValue::String)),
            _ => operational_scalar(self, &self.meta, key),
        }
    }

    fn set_scalar(&mut self, key: &str, value: Option<ScalarValue>) -> ScimResult<()> {
        match key {
            "displayName" => self.display_name = string_field(key, value)?,
            "description" => self.description = string_field(key, value)?,
            _ => return Err(unknown_field(self.resource_type(), key)),
        }
        Ok(())
    }

    fn collection_mut(&mut self, key: &str) -> ScimResult<&mut dyn MemberCollection> {
        match key {
            "members" => Ok(&mut self.members),
            _ => Err(unknown_field(self.resource_type(), key)),
        }
    }
}
