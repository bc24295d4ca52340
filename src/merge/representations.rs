//! Inbound representations of the built-in resource types.
//!
//! Every field is optional: `None` means the client did not send it. Member
//! collections stay raw JSON until the merge, where they are built through
//! [`build_members`] like PATCH values are.

use super::Representation;
use crate::error::{ScimError, ScimResult};
use crate::lookup::PrincipalLookup;
use crate::resource::member::build_members;
use crate::resource::value_objects::EmailAddress;
use crate::resource::{Role, Tenant, User};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn from_json<R: DeserializeOwned>(resource_type: &str, value: &Value) -> ScimResult<R> {
    serde_json::from_value(value.clone()).map_err(|e| {
        ScimError::invalid_value(format!("malformed {} representation: {}", resource_type, e))
    })
}

fn overwrite<T: Clone>(target: &mut Option<T>, inbound: &Option<T>) {
    if inbound.is_some() {
        target.clone_from(inbound);
    }
}

/// Inbound User representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResource {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Value>>,
    #[serde(
        rename = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User",
        skip_serializing_if = "Option::is_none"
    )]
    pub enterprise: Option<EnterpriseUserExtension>,
}

/// Enterprise User extension attributes (RFC 7643 §4.3) a user carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseUserExtension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl UserResource {
    pub fn from_json(value: &Value) -> ScimResult<Self> {
        from_json("User", value)
    }
}

impl Representation for UserResource {
    type Entity = User;

    fn merge_into(&self, user: &mut User, lookup: &dyn PrincipalLookup) -> ScimResult<()> {
        overwrite(&mut user.user_name, &self.user_name);
        overwrite(&mut user.display_name, &self.display_name);
        overwrite(&mut user.nick_name, &self.nick_name);
        overwrite(&mut user.title, &self.title);
        overwrite(&mut user.active, &self.active);
        overwrite(&mut user.valid_from, &self.valid_from);
        overwrite(&mut user.valid_until, &self.valid_until);
        if let Some(enterprise) = &self.enterprise {
            overwrite(&mut user.department, &enterprise.department);
        }

        if let Some(emails) = &self.emails {
            let inbound = build_members::<EmailAddress>(emails, lookup)?;
            replace_emails_by_type(&mut user.emails, inbound);
        }
        if let Some(roles) = &self.roles {
            user.roles = build_members(roles, lookup)?;
        }
        Ok(())
    }
}

/// Replace the emails of every type present in `inbound`, keeping the rest.
fn replace_emails_by_type(emails: &mut Vec<EmailAddress>, inbound: Vec<EmailAddress>) {
    emails.retain(|existing| {
        !inbound
            .iter()
            .any(|email| existing.has_type(email.email_type()))
    });
    emails.extend(inbound);
}

/// Inbound Group (role) representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResource {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Value>>,
}

impl GroupResource {
    pub fn from_json(value: &Value) -> ScimResult<Self> {
        from_json("Group", value)
    }
}

impl Representation for GroupResource {
    type Entity = Role;

    fn merge_into(&self, role: &mut Role, lookup: &dyn PrincipalLookup) -> ScimResult<()> {
        overwrite(&mut role.display_name, &self.display_name);
        overwrite(&mut role.description, &self.description);
        if let Some(members) = &self.members {
            role.members = build_members(members, lookup)?;
        }
        Ok(())
    }
}

/// Inbound Tenant representation. `displayName` and `roles` map onto the
/// tenant's name and claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantResource {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Value>>,
}

impl TenantResource {
    pub fn from_json(value: &Value) -> ScimResult<Self> {
        from_json("Tenant", value)
    }
}

impl Representation for TenantResource {
    type Entity = Tenant;

    fn merge_into(&self, tenant: &mut Tenant, lookup: &dyn PrincipalLookup) -> ScimResult<()> {
        overwrite(&mut tenant.name, &self.display_name);
        overwrite(&mut tenant.active, &self.active);
        if let Some(roles) = &self.roles {
            tenant.claims = build_members(roles, lookup)?;
        }
        Ok(())
    }
}
