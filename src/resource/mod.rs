//! Entity model for the governance resources the engine patches.
//!
//! This module defines the entities (users, roles and tenants), their member
//! value objects, and the [`ScimEntity`] capability through which the PATCH
//! engine and the merger reach an entity's fields by internal key.
//!
//! # Key Types
//!
//! - [`ScimEntity`] - Scalar getters/setters and member collections by internal key
//! - [`ScalarValue`] - A typed single attribute value
//! - [`Member`] / [`MemberCollection`] - Elements of multi-valued attributes
//! - [`EntityVersion`] - Content hash of an entity, rendered as a weak ETag

pub mod member;
pub mod role;
pub mod tenant;
pub mod user;
pub mod value_objects;
pub mod version;

pub use member::{Member, MemberCollection};
pub use role::Role;
pub use tenant::Tenant;
pub use user::User;
pub use version::EntityVersion;

use crate::error::{ScimError, ScimResult};
use crate::schema::{AttributeKind, ResourceType};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A typed value of a single-valued attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    String(String),
    Boolean(bool),
    DateTime(DateTime<Utc>),
}

impl ScalarValue {
    /// The attribute kind this value belongs to.
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::String(_) => AttributeKind::ScalarString,
            Self::Boolean(_) => AttributeKind::ScalarBool,
            Self::DateTime(_) => AttributeKind::ScalarDate,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::String(text) => Value::String(text.clone()),
            Self::Boolean(flag) => Value::Bool(*flag),
            Self::DateTime(instant) => {
                Value::String(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) => f.write_str(text),
            Self::Boolean(flag) => write!(f, "{}", flag),
            Self::DateTime(instant) => {
                f.write_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for ScalarValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

/// Field access an entity exposes to the PATCH engine.
///
/// Keys are the internal keys of the entity's
/// [`AttributeSchema`](crate::schema::AttributeSchema). A key the entity does
/// not have, or a value of the wrong kind, means the entity and its schema
/// table disagree and is reported as an internal error.
pub trait ScimEntity: Clone + Serialize {
    fn resource_type(&self) -> ResourceType;

    fn id(&self) -> i64;

    /// Current value of a scalar field. `None` means unassigned.
    fn scalar(&self, key: &str) -> ScimResult<Option<ScalarValue>>;

    /// Set or clear a scalar field.
    fn set_scalar(&mut self, key: &str, value: Option<ScalarValue>) -> ScimResult<()>;

    /// Mutable access to a member collection.
    fn collection_mut(&mut self, key: &str) -> ScimResult<&mut dyn MemberCollection>;
}

pub(crate) fn unknown_field(resource_type: ResourceType, key: &str) -> ScimError {
    ScimError::internal(format!("{} has no field '{}'", resource_type, key))
}

fn wrong_kind(key: &str, expected: AttributeKind, value: &ScalarValue) -> ScimError {
    ScimError::internal(format!(
        "field '{}' expects {:?}, got {:?}",
        key,
        expected,
        value.kind()
    ))
}

pub(crate) fn string_field(key: &str, value: Option<ScalarValue>) -> ScimResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(ScalarValue::String(text)) => Ok(Some(text)),
        Some(other) => Err(wrong_kind(key, AttributeKind::ScalarString, &other)),
    }
}

pub(crate) fn bool_field(key: &str, value: Option<ScalarValue>) -> ScimResult<Option<bool>> {
    match value {
        None => Ok(None),
        Some(ScalarValue::Boolean(flag)) => Ok(Some(flag)),
        Some(other) => Err(wrong_kind(key, AttributeKind::ScalarBool, &other)),
    }
}

pub(crate) fn date_field(
    key: &str,
    value: Option<ScalarValue>,
) -> ScimResult<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(ScalarValue::DateTime(instant)) => Ok(Some(instant)),
        Some(other) => Err(wrong_kind(key, AttributeKind::ScalarDate, &other)),
    }
}

/// Read access to the operational attributes every entity shares.
pub(crate) fn operational_scalar<E: ScimEntity>(
    entity: &E,
    meta: &value_objects::Meta,
    key: &str,
) -> ScimResult<Option<ScalarValue>> {
    Ok(match key {
        "id" => Some(ScalarValue::String(entity.id().to_string())),
        "created" => meta.created.map(ScalarValue::DateTime),
        "lastModified" => meta.last_modified.map(ScalarValue::DateTime),
        "location" => meta.location.clone().map(ScalarValue::String),
        "resourceType" => Some(ScalarValue::String(entity.resource_type().to_string())),
        "version" => Some(ScalarValue::String(
            EntityVersion::of(entity)?.to_etag(),
        )),
        _ => return Err(unknown_field(entity.resource_type(), key)),
    })
}
