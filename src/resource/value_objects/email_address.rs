//! EmailAddress value object for SCIM email addresses.
//!
//! Email addresses are plain values; they reference no principal. Two entries
//! are the same email when both the address (case-insensitively) and the type
//! match.

use crate::error::{ScimError, ScimResult};
use crate::filter::{FieldRef, Filterable};
use crate::lookup::PrincipalLookup;
use crate::resource::member::{Member, member_object, optional_bool, optional_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A validated SCIM email address.
///
/// ## Validation Rules
///
/// - Email value must not be empty and must contain `@`
/// - Email type, if provided, must not be empty
///
/// ## Examples
///
/// ```rust
/// use scim_patch::resource::value_objects::EmailAddress;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let email = EmailAddress::new("bjensen@example.com", Some("work"))?.with_primary(true);
///     assert_eq!(email.email_type(), Some("work"));
///     assert!(email.is_primary());
///
///     assert!(EmailAddress::new("not-an-address", None).is_err());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress {
    value: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    email_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
}

impl EmailAddress {
    /// Create an email address, enforcing the validation rules.
    pub fn new(value: impl Into<String>, email_type: Option<&str>) -> ScimResult<Self> {
        let value = value.into();
        Self::validate_value(&value)?;
        if let Some(type_val) = email_type {
            Self::validate_type(type_val)?;
        }
        Ok(Self {
            value,
            email_type: email_type.map(str::to_string),
            primary: None,
            display: None,
        })
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn email_type(&self) -> Option<&str> {
        self.email_type.as_deref()
    }

    pub fn is_primary(&self) -> bool {
        self.primary.unwrap_or(false)
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Whether this address has the given type, compared case-insensitively.
    pub fn has_type(&self, email_type: Option<&str>) -> bool {
        match (self.email_type.as_deref(), email_type) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        }
    }

    fn validate_value(value: &str) -> ScimResult<()> {
        if value.trim().is_empty() {
            return Err(ScimError::invalid_value("Email value cannot be empty"));
        }
        if !value.contains('@') {
            return Err(ScimError::invalid_value(format!(
                "'{}' is not an email address",
                value
            )));
        }
        Ok(())
    }

    fn validate_type(email_type: &str) -> ScimResult<()> {
        if email_type.trim().is_empty() {
            return Err(ScimError::invalid_value("Email type cannot be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email_type {
            Some(email_type) => write!(f, "{} ({})", self.value, email_type),
            None => f.write_str(&self.value),
        }
    }
}

impl Filterable for EmailAddress {
    fn resolve_field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "value" => Some(FieldRef::string(Some(&self.value))),
            "type" => Some(FieldRef::string(self.email_type.as_deref())),
            "primary" => Some(FieldRef::Boolean(self.primary)),
            "display" => Some(FieldRef::string(self.display.as_deref())),
            _ => None,
        }
    }
}

impl Member for EmailAddress {
    const ATTRIBUTE: &'static str = "emails";

    fn from_json(value: &Value, _lookup: &dyn PrincipalLookup) -> ScimResult<Self> {
        let object = member_object(Self::ATTRIBUTE, value)?;
        let address = optional_string(Self::ATTRIBUTE, object, "value")?
            .ok_or_else(|| ScimError::invalid_value("emails entry requires a 'value'"))?;
        let email_type = optional_string(Self::ATTRIBUTE, object, "type")?;
        let mut email = Self::new(address, email_type.as_deref())?;
        email.primary = optional_bool(Self::ATTRIBUTE, object, "primary")?;
        email.display = optional_string(Self::ATTRIBUTE, object, "display")?;
        Ok(email)
    }

    fn same_member(&self, other: &Self) -> bool {
        self.value.eq_ignore_ascii_case(&other.value) && self.has_type(other.email_type.as_deref())
    }
}
