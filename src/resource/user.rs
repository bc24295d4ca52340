//! User entity.

use super::value_objects::{EmailAddress, Meta, RoleAssignment};
use super::{
    MemberCollection, ScalarValue, ScimEntity, bool_field, date_field, operational_scalar,
    string_field, unknown_field,
};
use crate::error::ScimResult;
use crate::schema::ResourceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account with its email addresses and role assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
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
    /// Enterprise extension `department`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default)]
    pub emails: Vec<EmailAddress>,
    #[serde(default)]
    pub roles: Vec<RoleAssignment>,
    #[serde(default)]
    pub meta: Meta,
}

impl User {
    pub fn new(id: i64, user_name: impl Into<String>) -> Self {
        Self {
            id,
            user_name: Some(user_name.into()),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_emails(mut self, emails: Vec<EmailAddress>) -> Self {
        self.emails = emails;
        self
    }

    pub fn with_roles(mut self, roles: Vec<RoleAssignment>) -> Self {
        self.roles = roles;
        self
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn emails(&self) -> &[EmailAddress] {
        &self.emails
    }

    pub fn roles(&self) -> &[RoleAssignment] {
        &self.roles
    }

    /// Whether the account is active at `now`, honouring the validity window.
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        self.active.unwrap_or(true)
            && self.valid_from.is_none_or(|from| from <= now)
            && self.valid_until.is_none_or(|until| now < until)
    }
}

impl ScimEntity for User {
    fn resource_type(&self) -> ResourceType {
        ResourceType::User
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn scalar(&self, key: &str) -> ScimResult<Option<ScalarValue>> {
        let text = |value: &Option<String>| value.clone().map(ScalarValue::String);
        match key {
            "userName" => Ok(text(&self.user_name)),
            "displayName" => Ok(text(&self.display_name)),
            "nickName" => Ok(text(&self.nick_name)),
            "title" => Ok(text(&self.title)),
            "active" => Ok(self.active.map(ScalarValue::Boolean)),
            "validFrom" => Ok(self.valid_from.map(ScalarValue::DateTime)),
            "validUntil" => Ok(self.valid_until.map(ScalarValue::DateTime)),
            "department" => Ok(text(&self.department)),
            _ => operational_scalar(self, &self.meta, key),
        }
    }

    fn set_scalar(&mut self, key: &str, value: Option<ScalarValue>) -> ScimResult<()> {
        match key {
            "userName" => self.user_name = string_field(key, value)?,
            "displayName" => self.display_name = string_field(key, value)?,
            "nickName" => self.nick_name = string_field(key, value)?,
            "title" => self.title = string_field(key, value)?,
            "active" => self.active = bool_field(key, value)?,
            "validFrom" => self.valid_from = date_field(key, value)?,
            "validUntil" => self.valid_until = date_field(key, value)?,
            "department" => self.department = string_field(key, value)?,
            _ => return Err(unknown_field(self.resource_type(), key)),
        }
        Ok(())
    }

    fn collection_mut(&mut self, key: &str) -> ScimResult<&mut dyn MemberCollection> {
        match key {
            "emails" => Ok(&mut self.emails),
            "roles" => Ok(&mut self.roles),
            _ => Err(unknown_field(self.resource_type(), key)),
        }
    }
}
