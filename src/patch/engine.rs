//! The PATCH engine.
//!
//! [`PatchEngine`] applies RFC 7644 §3.5.2 operations to one entity snapshot
//! owned by the caller. Target paths are resolved through the resource type's
//! [`AttributeSchema`]; scalar attributes are mutated directly and member
//! collections through [`MemberCollection`], with value filters evaluated by
//! the [`FilterEvaluator`].
//!
//! # Atomicity
//!
//! Every operation either succeeds completely or leaves the entity exactly as
//! it was:
//! - collection adds and replaces build every member, resolving principals,
//!   before the collection is touched
//! - filtered removes evaluate the filter on every member before removing any
//! - operations without a path are staged on a copy of the entity and
//!   committed only when every attribute succeeded
//!
//! A request is applied operation by operation; an operation that fails stops
//! the request but the operations before it stay applied.

use super::{PatchOpType, PatchOperation, PatchRequest};
use crate::config::PatchConfig;
use crate::error::{ScimError, ScimResult};
use crate::filter::{AttributePath, FilterEvaluator};
use crate::lookup::PrincipalLookup;
use crate::resource::{ScalarValue, ScimEntity};
use crate::schema::{AttributeDescriptor, AttributeKind, AttributeSchema};
use chrono::{DateTime, Utc};
use log::{debug, trace, warn};
use serde_json::{Map, Value};

/// Outcome of a successful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The entity was modified
    Modified,
    /// The operation succeeded without changing anything
    Unchanged,
}

impl Change {
    pub fn is_modified(&self) -> bool {
        matches!(self, Self::Modified)
    }

    /// `Modified` if either side is.
    pub fn or(self, other: Change) -> Change {
        if self.is_modified() || other.is_modified() {
            Self::Modified
        } else {
            Self::Unchanged
        }
    }
}

impl From<bool> for Change {
    fn from(modified: bool) -> Self {
        if modified {
            Self::Modified
        } else {
            Self::Unchanged
        }
    }
}

/// Applies PATCH operations to entities of one resource type.
///
/// The engine borrows the schema table and the principal lookup; it holds no
/// other state and can be created per request.
pub struct PatchEngine<'a> {
    schema: &'a AttributeSchema,
    lookup: &'a dyn PrincipalLookup,
    config: PatchConfig,
    evaluator: FilterEvaluator,
}

impl<'a> PatchEngine<'a> {
    /// Create an engine with the default configuration.
    pub fn new(schema: &'a AttributeSchema, lookup: &'a dyn PrincipalLookup) -> Self {
        Self::with_config(schema, lookup, PatchConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(
        schema: &'a AttributeSchema,
        lookup: &'a dyn PrincipalLookup,
        config: PatchConfig,
    ) -> Self {
        let evaluator = FilterEvaluator::from_config(&config);
        Self {
            schema,
            lookup,
            config,
            evaluator,
        }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Apply every operation of `request` in order.
    ///
    /// Stops at the first failing operation and returns its error. The
    /// operations before it stay applied.
    pub fn apply_request<E: ScimEntity>(
        &self,
        entity: &mut E,
        request: &PatchRequest,
    ) -> ScimResult<Vec<Change>> {
        request.validate()?;
        if let Some(limit) = self.config.max_operations {
            let count = request.operations.len();
            if count > limit {
                warn!(
                    "Rejecting PatchOp request with {} operations, limit is {}",
                    count, limit
                );
                return Err(ScimError::TooMany { count, limit });
            }
        }

        request
            .operations
            .iter()
            .map(|operation| self.apply(entity, operation))
            .collect()
    }

    /// Apply a single operation.
    ///
    /// # Errors
    ///
    /// - `invalidPath` - the path is unknown, read-only, or carries a filter
    ///   the operation does not allow
    /// - `invalidValue` - the value is missing or has the wrong JSON shape
    /// - `invalidFilter` - the path's value filter cannot be evaluated
    /// - `noTarget` - `remove` without a path, or a filtered `replace` that
    ///   matched nothing
    /// - `NotFound` - a member references a principal that does not exist
    pub fn apply<E: ScimEntity>(
        &self,
        entity: &mut E,
        operation: &PatchOperation,
    ) -> ScimResult<Change> {
        if entity.resource_type() != self.schema.resource_type() {
            return Err(ScimError::internal(format!(
                "{} engine cannot patch a {}",
                self.schema.resource_type(),
                entity.resource_type()
            )));
        }
        debug!(
            "Applying '{}' to {} {}",
            operation,
            entity.resource_type(),
            entity.id()
        );

        let change = match operation.op {
            PatchOpType::Add | PatchOpType::Replace => {
                let value = operation
                    .value
                    .as_ref()
                    .filter(|value| !value.is_null())
                    .ok_or_else(|| {
                        ScimError::invalid_value(format!(
                            "'{}' operation requires a value",
                            operation.op
                        ))
                    })?;
                match &operation.path {
                    Some(path) if !path.is_empty() => {
                        self.apply_path(entity, operation.op, path, value)?
                    }
                    _ => self.apply_root(entity, operation.op, value)?,
                }
            }
            PatchOpType::Remove => {
                let path = operation
                    .path
                    .as_ref()
                    .filter(|path| !path.is_empty())
                    .ok_or_else(|| ScimError::no_target("'remove' operation requires a path"))?;
                self.remove(entity, path)?
            }
        };

        trace!("'{}' finished: {:?}", operation, change);
        Ok(change)
    }

    /// `add` or `replace` with a target path.
    fn apply_path<E: ScimEntity>(
        &self,
        entity: &mut E,
        op: PatchOpType,
        path: &AttributePath,
        value: &Value,
    ) -> ScimResult<Change> {
        let descriptor = self.schema.resolve_mutable(path)?;

        if descriptor.kind.is_collection() {
            let values = value.as_array().ok_or_else(|| {
                ScimError::invalid_value(format!(
                    "'{}' on '{}' requires an array of members",
                    op, descriptor.external_name
                ))
            })?;
            let collection = entity.collection_mut(&descriptor.internal_key)?;

            let modified = match (op, path.filter()) {
                (PatchOpType::Add, Some(_)) => {
                    return Err(ScimError::invalid_path(
                        path.to_string(),
                        "a value filter is not allowed on 'add'",
                    ));
                }
                (PatchOpType::Add, None) => collection.add_values(values, self.lookup)?,
                (_, None) => collection.replace_values(values, self.lookup)?,
                (_, Some(filter)) => {
                    collection.replace_matching(filter, &self.evaluator, values, self.lookup)?
                }
            };
            return Ok(Change::from(modified));
        }

        reject_filter_on_scalar(path)?;
        let new_value = self.coerce_scalar(descriptor, value)?;
        let current = entity.scalar(&descriptor.internal_key)?;
        if current.as_ref() == Some(&new_value) {
            if op == PatchOpType::Replace {
                entity.set_scalar(&descriptor.internal_key, Some(new_value))?;
            }
            return Ok(Change::Unchanged);
        }
        entity.set_scalar(&descriptor.internal_key, Some(new_value))?;
        Ok(Change::Modified)
    }

    /// `add` or `replace` without a path: every member of the value object
    /// names a target attribute.
    fn apply_root<E: ScimEntity>(
        &self,
        entity: &mut E,
        op: PatchOpType,
        value: &Value,
    ) -> ScimResult<Change> {
        let object = value.as_object().ok_or_else(|| {
            ScimError::invalid_value(format!(
                "'{}' without a path requires a JSON object value",
                op
            ))
        })?;

        let mut staged = entity.clone();
        let change = self.apply_object(&mut staged, op, None, object)?;
        *entity = staged;
        Ok(change)
    }

    fn apply_object<E: ScimEntity>(
        &self,
        entity: &mut E,
        op: PatchOpType,
        schema_uri: Option<&str>,
        object: &Map<String, Value>,
    ) -> ScimResult<Change> {
        let mut change = Change::Unchanged;
        for (key, member) in object {
            if key.eq_ignore_ascii_case("schemas") && schema_uri.is_none() {
                continue;
            }

            // Extension attributes are nested under their schema URN
            let is_schema_uri = self
                .schema
                .schema_uris()
                .iter()
                .any(|uri| uri.eq_ignore_ascii_case(key));
            if schema_uri.is_none() && is_schema_uri {
                let nested = member.as_object().ok_or_else(|| {
                    ScimError::invalid_value(format!("'{}' must be a JSON object", key))
                })?;
                change = change.or(self.apply_object(entity, op, Some(key.as_str()), nested)?);
                continue;
            }

            if member.is_null() {
                return Err(ScimError::invalid_value(format!(
                    "'{}' operation requires a value for '{}'",
                    op, key
                )));
            }
            let path = match schema_uri {
                Some(uri) => AttributePath::parse(key)?.with_schema(uri),
                None => AttributePath::parse(key)?,
            };
            change = change.or(self.apply_path(entity, op, &path, member)?);
        }
        Ok(change)
    }

    fn remove<E: ScimEntity>(&self, entity: &mut E, path: &AttributePath) -> ScimResult<Change> {
        let descriptor = self.schema.resolve_mutable(path)?;

        if descriptor.kind.is_collection() {
            let collection = entity.collection_mut(&descriptor.internal_key)?;
            let modified = match path.filter() {
                None => collection.clear(),
                Some(filter) => collection.remove_matching(filter, &self.evaluator)? > 0,
            };
            return Ok(Change::from(modified));
        }

        reject_filter_on_scalar(path)?;
        let current = entity.scalar(&descriptor.internal_key)?;
        entity.set_scalar(&descriptor.internal_key, None)?;
        Ok(Change::from(current.is_some()))
    }

    /// Coerce a JSON value to the descriptor's scalar kind.
    fn coerce_scalar(
        &self,
        descriptor: &AttributeDescriptor,
        value: &Value,
    ) -> ScimResult<ScalarValue> {
        let name = &descriptor.external_name;
        match descriptor.kind {
            AttributeKind::ScalarString => value
                .as_str()
                .map(|text| ScalarValue::String(text.to_string()))
                .ok_or_else(|| {
                    ScimError::invalid_value(format!("'{}' must be a string, got {}", name, value))
                }),
            AttributeKind::ScalarBool => match value {
                Value::Bool(flag) => Ok(ScalarValue::Boolean(*flag)),
                Value::String(text) if self.config.coerce_boolean_strings => {
                    if text.eq_ignore_ascii_case("true") {
                        Ok(ScalarValue::Boolean(true))
                    } else if text.eq_ignore_ascii_case("false") {
                        Ok(ScalarValue::Boolean(false))
                    } else {
                        Err(ScimError::invalid_value(format!(
                            "'{}' must be a boolean, got {}",
                            name, value
                        )))
                    }
                }
                _ => Err(ScimError::invalid_value(format!(
                    "'{}' must be a boolean, got {}",
                    name, value
                ))),
            },
            AttributeKind::ScalarDate => value
                .as_str()
                .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
                .map(|instant| ScalarValue::DateTime(instant.with_timezone(&Utc)))
                .ok_or_else(|| {
                    ScimError::invalid_value(format!(
                        "'{}' must be an RFC 3339 dateTime, got {}",
                        name, value
                    ))
                }),
            AttributeKind::Collection => Err(ScimError::internal(format!(
                "'{}' is a collection, not a scalar",
                name
            ))),
        }
    }
}

fn reject_filter_on_scalar(path: &AttributePath) -> ScimResult<()> {
    if path.filter().is_some() {
        return Err(ScimError::invalid_path(
            path.to_string(),
            "a value filter is only allowed on multi-valued attributes",
        ));
    }
    Ok(())
}
