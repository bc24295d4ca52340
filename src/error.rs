//! Error types for SCIM PATCH processing.
//!
//! Every failure the engine can produce is a client-input error surfaced
//! synchronously to the caller. The transport layer maps them to HTTP status
//! codes and RFC 7644 §3.12 `scimType` values through [`ScimError::status_code`]
//! and [`ScimError::scim_type`].

use serde_json::{Value, json};

/// Main error type for PATCH, merge and filter operations.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// The attribute path is unresolvable, malformed, or not mutable
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The value does not have the JSON shape the target attribute requires
    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    /// The filter is malformed or uses an operator not legal for its target
    #[error("Invalid filter: {message}")]
    InvalidFilter { message: String },

    /// The operation names no target, or its filter matched nothing
    #[error("No target: {message}")]
    NoTarget { message: String },

    /// A referenced principal does not exist
    #[error("Resource not found: {resource_type} with ID {id}")]
    NotFound { resource_type: String, id: String },

    /// The PatchOp message itself is malformed
    #[error("Invalid syntax: {message}")]
    InvalidSyntax { message: String },

    /// The request carries more operations than the engine accepts
    #[error("Too many operations: {count} exceeds the limit of {limit}")]
    TooMany { count: usize, limit: usize },

    /// Errors from the injected principal lookup
    #[error("Principal lookup error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The entity and its schema table disagree
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors raised while building attribute schema tables.
///
/// These are programming errors in a table definition and should surface
/// at startup rather than at request time.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Two attributes share an external name under case-insensitive comparison
    #[error("Duplicate attribute '{name}' in {resource_type} schema")]
    DuplicateAttribute { resource_type: String, name: String },

    /// An attribute was declared without a name or internal key
    #[error("Attribute in {resource_type} schema has an empty name or internal key")]
    EmptyAttribute { resource_type: String },

    /// The table declares no schema URN
    #[error("{resource_type} schema declares no schema URN")]
    MissingSchemaUri { resource_type: String },
}

impl ScimError {
    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    /// Create an invalid filter error
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: message.into(),
        }
    }

    /// Create a no target error
    pub fn no_target(message: impl Into<String>) -> Self {
        Self::NoTarget {
            message: message.into(),
        }
    }

    /// Create a resource not found error
    pub fn not_found(resource_type: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.to_string(),
        }
    }

    /// Create an invalid syntax error
    pub fn invalid_syntax(message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wrap a lookup error
    pub fn provider_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Provider(Box::new(error))
    }

    /// The RFC 7644 §3.12 `scimType` keyword, if the error has one.
    pub fn scim_type(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPath { .. } => Some("invalidPath"),
            Self::InvalidValue { .. } => Some("invalidValue"),
            Self::InvalidFilter { .. } => Some("invalidFilter"),
            Self::NoTarget { .. } => Some("noTarget"),
            Self::InvalidSyntax { .. } => Some("invalidSyntax"),
            Self::TooMany { .. } => Some("tooMany"),
            Self::NotFound { .. } | Self::Provider(_) | Self::Internal { .. } => None,
        }
    }

    /// The HTTP status code the transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Provider(_) | Self::Internal { .. } => 500,
            _ => 400,
        }
    }

    /// Whether this error was caused by the client's request.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Render the RFC 7644 §3.12 error response body.
    pub fn to_response(&self) -> Value {
        let mut body = json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
            "status": self.status_code().to_string(),
            "detail": self.to_string(),
        });
        if let Some(scim_type) = self.scim_type() {
            body["scimType"] = Value::String(scim_type.to_string());
        }
        body
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;
pub type BuildResult<T> = Result<T, BuildError>;
