//! Role membership value object.
//!
//! A role's `members` reference users by their numeric id. The display name
//! is taken from the directory when the member is built, so a client cannot
//! smuggle in a display name that disagrees with the referenced user.

use super::USER_MEMBER_TYPE;
use crate::error::{ScimError, ScimResult};
use crate::filter::{FieldRef, Filterable};
use crate::lookup::{PrincipalKind, PrincipalLookup, require};
use crate::resource::member::{Member, member_object, optional_string, principal_id};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single user membership of a role.
///
/// # Examples
///
/// ```rust
/// use scim_patch::resource::value_objects::GroupMember;
///
/// let member = GroupMember::new(42, Some("John Doe".to_string()));
/// assert_eq!(member.value(), 42);
/// assert_eq!(member.display_name(), Some("John Doe"));
/// assert_eq!(member.member_type(), "User");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Id of the member user
    value: i64,
    /// Display name of the member user
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
}

impl GroupMember {
    pub fn new(value: i64, display: Option<String>) -> Self {
        Self { value, display }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Members are always users.
    pub fn member_type(&self) -> &'static str {
        USER_MEMBER_TYPE
    }
}

impl fmt::Display for GroupMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display {
            Some(display) => write!(f, "{} [{}]", display, self.value),
            None => write!(f, "[{}]", self.value),
        }
    }
}

impl Filterable for GroupMember {
    fn resolve_field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "value" => Some(FieldRef::Integer(Some(self.value))),
            "display" => Some(FieldRef::string(self.display.as_deref())),
            "type" => Some(FieldRef::case_exact_string(Some(USER_MEMBER_TYPE))),
            _ => None,
        }
    }
}

impl Member for GroupMember {
    const ATTRIBUTE: &'static str = "members";

    fn from_json(value: &Value, lookup: &dyn PrincipalLookup) -> ScimResult<Self> {
        let object = member_object(Self::ATTRIBUTE, value)?;
        if let Some(member_type) = optional_string(Self::ATTRIBUTE, object, "type")? {
            if member_type != USER_MEMBER_TYPE {
                return Err(ScimError::invalid_value(format!(
                    "Member must be of type [{}], got '{}'",
                    USER_MEMBER_TYPE, member_type
                )));
            }
        }
        let id = principal_id(Self::ATTRIBUTE, object)?;
        let user = require(lookup, PrincipalKind::User, id)?;
        Ok(Self::new(user.id, user.display))
    }

    fn same_member(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
