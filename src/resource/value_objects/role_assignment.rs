//! User role assignment value object.

use crate::error::ScimResult;
use crate::filter::{FieldRef, Filterable};
use crate::lookup::{PrincipalKind, PrincipalLookup, require};
use crate::resource::member::{Member, member_object, optional_bool, principal_id};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A role a user holds, exposed as the user's `roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Id of the assigned role
    value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary: Option<bool>,
}

impl RoleAssignment {
    pub fn new(value: i64, display: Option<String>) -> Self {
        Self {
            value,
            display,
            primary: None,
        }
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn is_primary(&self) -> bool {
        self.primary.unwrap_or(false)
    }
}

impl Filterable for RoleAssignment {
    fn resolve_field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "value" => Some(FieldRef::Integer(Some(self.value))),
            "display" => Some(FieldRef::string(self.display.as_deref())),
            "primary" => Some(FieldRef::Boolean(self.primary)),
            _ => None,
        }
    }
}

impl Member for RoleAssignment {
    const ATTRIBUTE: &'static str = "roles";

    fn from_json(value: &Value, lookup: &dyn PrincipalLookup) -> ScimResult<Self> {
        let object = member_object(Self::ATTRIBUTE, value)?;
        let id = principal_id(Self::ATTRIBUTE, object)?;
        let primary = optional_bool(Self::ATTRIBUTE, object, "primary")?;
        let role = require(lookup, PrincipalKind::Role, id)?;
        Ok(Self {
            value: role.id,
            display: role.display,
            primary,
        })
    }

    fn same_member(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
