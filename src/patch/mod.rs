//! SCIM PATCH operations (RFC 7644 §3.5.2).
//!
//! This module provides the PatchOp message types and the [`PatchEngine`]
//! that applies them to entities.
//!
//! # Usage
//!
//! ```rust
//! use scim_patch::lookup::{InMemoryDirectory, Principal};
//! use scim_patch::patch::{PatchEngine, PatchRequest};
//! use scim_patch::resource::Role;
//! use scim_patch::schema::SchemaRegistry;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let directory = InMemoryDirectory::with_principals([Principal::user(5, "Eve")]);
//! let engine = PatchEngine::new(registry.group_schema(), &directory);
//!
//! let request = PatchRequest::from_value(json!({
//!     "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
//!     "Operations": [
//!         {"op": "add", "path": "displayName", "value": "Ops Team"},
//!         {"op": "add", "path": "members", "value": [{"value": 5, "type": "User"}]},
//!     ]
//! }))?;
//!
//! let mut role = Role::new(10);
//! engine.apply_request(&mut role, &request)?;
//! assert_eq!(role.display_name(), Some("Ops Team"));
//! assert_eq!(role.members()[0].display_name(), Some("Eve"));
//! # Ok(())
//! # }
//! ```

pub mod engine;

pub use engine::{Change, PatchEngine};

use crate::error::{ScimError, ScimResult};
use crate::filter::AttributePath;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Schema URN every PatchOp message must declare.
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// Patch operation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOpType {
    Add,
    Replace,
    Remove,
}

impl PatchOpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Remove => "remove",
        }
    }

    /// Parse an operation name case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "replace" => Some(Self::Replace),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

impl fmt::Display for PatchOpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PatchOpType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PatchOpType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name).ok_or_else(|| {
            serde::de::Error::unknown_variant(&name, &["add", "replace", "remove"])
        })
    }
}

/// A single PATCH operation.
///
/// Fields are public so operations can be built directly; the engine checks
/// the invariants (a path for `remove`, a non-null value for `add` and
/// `replace`) when the operation is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPatchOperation", into = "RawPatchOperation")]
pub struct PatchOperation {
    pub op: PatchOpType,
    pub path: Option<AttributePath>,
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn new(op: PatchOpType, path: Option<AttributePath>, value: Option<Value>) -> Self {
        Self { op, path, value }
    }

    /// `add` on a parsed path.
    pub fn add(path: &str, value: impl Into<Value>) -> ScimResult<Self> {
        Ok(Self::new(
            PatchOpType::Add,
            Some(AttributePath::parse(path)?),
            Some(value.into()),
        ))
    }

    /// `replace` on a parsed path.
    pub fn replace(path: &str, value: impl Into<Value>) -> ScimResult<Self> {
        Ok(Self::new(
            PatchOpType::Replace,
            Some(AttributePath::parse(path)?),
            Some(value.into()),
        ))
    }

    /// `remove` on a parsed path.
    pub fn remove(path: &str) -> ScimResult<Self> {
        Ok(Self::new(
            PatchOpType::Remove,
            Some(AttributePath::parse(path)?),
            None,
        ))
    }

    /// Parse one element of a request's `Operations` array.
    ///
    /// Unlike deserializing through serde, failures keep their SCIM error
    /// kind: a malformed path is `invalidPath`, anything else `invalidSyntax`.
    pub fn from_json(value: &Value) -> ScimResult<Self> {
        let raw: RawPatchOperation = serde_json::from_value(value.clone())
            .map_err(|e| ScimError::invalid_syntax(format!("malformed operation: {}", e)))?;
        Self::try_from(raw)
    }
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} {}", self.op, path),
            None => write!(f, "{} <root>", self.op),
        }
    }
}

/// Wire form of [`PatchOperation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawPatchOperation {
    op: PatchOpType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl TryFrom<RawPatchOperation> for PatchOperation {
    type Error = ScimError;

    fn try_from(raw: RawPatchOperation) -> Result<Self, Self::Error> {
        // A blank path is the same as no path
        let path = match raw.path.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(path) => Some(AttributePath::parse(path)?),
        };
        Ok(Self::new(raw.op, path, raw.value))
    }
}

impl From<PatchOperation> for RawPatchOperation {
    fn from(operation: PatchOperation) -> Self {
        Self {
            op: operation.op,
            path: operation.path.map(|path| path.to_string()),
            value: operation.value,
        }
    }
}

/// The RFC 7644 §3.5.2 PatchOp message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    pub schemas: Vec<String>,
    #[serde(rename = "Operations")]
    pub operations: Vec<PatchOperation>,
}

impl PatchRequest {
    /// A request declaring the PatchOp schema.
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            schemas: vec![PATCH_OP_SCHEMA.to_string()],
            operations,
        }
    }

    /// Parse and validate a PatchOp message.
    pub fn from_value(value: Value) -> ScimResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ScimError::invalid_syntax("PatchOp message must be a JSON object"))?;

        let schemas: Vec<String> = match object.get("schemas") {
            Some(schemas) => serde_json::from_value(schemas.clone())
                .map_err(|_| ScimError::invalid_syntax("'schemas' must be an array of strings"))?,
            None => Vec::new(),
        };

        let operations = match object.get("Operations").or_else(|| object.get("operations")) {
            Some(Value::Array(items)) => items
                .iter()
                .map(PatchOperation::from_json)
                .collect::<ScimResult<Vec<_>>>()?,
            Some(_) => return Err(ScimError::invalid_syntax("'Operations' must be an array")),
            None => Vec::new(),
        };

        let request = Self {
            schemas,
            operations,
        };
        request.validate()?;
        Ok(request)
    }

    /// Parse and validate a PatchOp message from JSON text.
    pub fn from_json_str(json: &str) -> ScimResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ScimError::invalid_syntax(format!("malformed JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Check the message-level invariants.
    pub fn validate(&self) -> ScimResult<()> {
        if !self.schemas.iter().any(|schema| schema == PATCH_OP_SCHEMA) {
            return Err(ScimError::invalid_syntax(format!(
                "'schemas' must contain {}",
                PATCH_OP_SCHEMA
            )));
        }
        if self.operations.is_empty() {
            return Err(ScimError::invalid_syntax(
                "'Operations' must contain at least one operation",
            ));
        }
        Ok(())
    }
}
