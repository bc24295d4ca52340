//! Tenant role claim value object.
//!
//! A tenant grants users a scoped claim on it, exposed to SCIM clients as the
//! tenant's `roles`. The same user may hold several claims that differ by
//! scope, so the natural key is the pair of user id and scope.

use super::USER_MEMBER_TYPE;
use crate::error::{ScimError, ScimResult};
use crate::filter::{FieldRef, Filterable};
use crate::lookup::{PrincipalKind, PrincipalLookup, require};
use crate::resource::member::{Member, member_object, optional_string, principal_id};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scoped claim of one user on a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantClaim {
    /// Id of the claiming user
    value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
    /// Scope of the claim, e.g. `read`
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

impl TenantClaim {
    pub fn new(value: i64, display: Option<String>, scope: Option<String>) -> Self {
        Self {
            value,
            display,
            scope,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

impl Filterable for TenantClaim {
    fn resolve_field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "value" => Some(FieldRef::Integer(Some(self.value))),
            "display" => Some(FieldRef::string(self.display.as_deref())),
            "scope" => Some(FieldRef::string(self.scope.as_deref())),
            "type" => Some(FieldRef::case_exact_string(Some(USER_MEMBER_TYPE))),
            _ => None,
        }
    }
}

impl Member for TenantClaim {
    const ATTRIBUTE: &'static str = "roles";

    fn from_json(value: &Value, lookup: &dyn PrincipalLookup) -> ScimResult<Self> {
        let object = member_object(Self::ATTRIBUTE, value)?;
        // Unlike role members, tenant claims must name their type
        match optional_string(Self::ATTRIBUTE, object, "type")?.as_deref() {
            Some(USER_MEMBER_TYPE) => {}
            other => {
                return Err(ScimError::invalid_value(format!(
                    "Member must be of type [{}], got {:?}",
                    USER_MEMBER_TYPE, other
                )));
            }
        }
        let id = principal_id(Self::ATTRIBUTE, object)?;
        let scope = optional_string(Self::ATTRIBUTE, object, "scope")?;
        let user = require(lookup, PrincipalKind::User, id)?;
        Ok(Self::new(user.id, user.display, scope))
    }

    fn same_member(&self, other: &Self) -> bool {
        self.value == other.value && self.scope == other.scope
    }
}
