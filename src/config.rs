//! Engine configuration.
//!
//! [`PatchConfig`] carries the few policy decisions that differ between
//! deployments. It deserializes from any serde format so it can live in the
//! host service's configuration file next to the transport settings.
//!
//! ```rust
//! use scim_patch::config::{PatchConfig, UnknownAttributePolicy};
//!
//! let config: PatchConfig = serde_json::from_str(
//!     r#"{"unknownAttributePolicy": "strict", "maxOperations": 50}"#,
//! ).unwrap();
//! assert_eq!(config.unknown_attribute_policy, UnknownAttributePolicy::Strict);
//! assert!(config.coerce_boolean_strings);
//! ```

use serde::{Deserialize, Serialize};

/// How the filter evaluator treats an attribute name the member type does
/// not expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownAttributePolicy {
    /// The expression evaluates to `false`
    #[default]
    Permissive,
    /// The expression fails with `invalidFilter`
    Strict,
}

/// Configuration for [`PatchEngine`](crate::patch::PatchEngine) and
/// [`FilterEvaluator`](crate::filter::FilterEvaluator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchConfig {
    /// Policy for unknown attribute paths inside member filters
    pub unknown_attribute_policy: UnknownAttributePolicy,
    /// Accept `"true"`/`"false"` strings for boolean attributes
    pub coerce_boolean_strings: bool,
    /// Upper bound on operations in one PatchOp request
    pub max_operations: Option<usize>,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            unknown_attribute_policy: UnknownAttributePolicy::Permissive,
            coerce_boolean_strings: true,
            max_operations: None,
        }
    }
}

impl PatchConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown attribute policy.
    pub fn with_unknown_attribute_policy(mut self, policy: UnknownAttributePolicy) -> Self {
        self.unknown_attribute_policy = policy;
        self
    }

    /// Enable or disable boolean string coercion.
    pub fn with_boolean_string_coercion(mut self, enabled: bool) -> Self {
        self.coerce_boolean_strings = enabled;
        self
    }

    /// Limit the number of operations per request.
    pub fn with_max_operations(mut self, limit: usize) -> Self {
        self.max_operations = Some(limit);
        self
    }
}
