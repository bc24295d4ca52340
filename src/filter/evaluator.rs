//! Evaluation of filter expressions against a single member record.
//!
//! The evaluator is parametric over the record type: anything implementing
//! [`Filterable`] can be filtered. Member types expose their fields by name and
//! the evaluator applies RFC 7644 §3.4.2.2 operator semantics according to the
//! field's type.

use super::{CompareOp, Filter, MAX_NESTING_DEPTH};
use crate::config::{PatchConfig, UnknownAttributePolicy};
use crate::error::{ScimError, ScimResult};
use chrono::{DateTime, Utc};
use log::{debug, trace};
use serde_json::Value;
use std::cmp::Ordering;

/// A parsed filter nests at most `or`, `and` and `not` per group.
const MAX_TREE_DEPTH: usize = 3 * (MAX_NESTING_DEPTH + 1);

/// A typed, borrowed view of one field of a record.
///
/// `None` and empty strings are the same unassigned state (RFC 7643 §2.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Integer(Option<i64>),
    String {
        value: Option<&'a str>,
        case_exact: bool,
    },
    Boolean(Option<bool>),
    DateTime(Option<DateTime<Utc>>),
}

impl<'a> FieldRef<'a> {
    /// A case-insensitive string field.
    pub fn string(value: Option<&'a str>) -> Self {
        Self::String {
            value,
            case_exact: false,
        }
    }

    /// A string field compared byte for byte.
    pub fn case_exact_string(value: Option<&'a str>) -> Self {
        Self::String {
            value,
            case_exact: true,
        }
    }

    /// Whether the field holds a value.
    pub fn is_assigned(&self) -> bool {
        match self {
            Self::Integer(value) => value.is_some(),
            Self::String { value, .. } => value.is_some_and(|v| !v.is_empty()),
            Self::Boolean(value) => value.is_some(),
            Self::DateTime(value) => value.is_some(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::String { .. } => "string",
            Self::Boolean(_) => "boolean",
            Self::DateTime(_) => "dateTime",
        }
    }
}

/// Field accessor capability a record exposes to the [`FilterEvaluator`].
pub trait Filterable {
    /// Look up a field by attribute name.
    ///
    /// The evaluator passes the name in lower case. Returns `None` when the
    /// record type has no such attribute, which is distinct from an attribute
    /// that exists but is unassigned.
    fn resolve_field(&self, name: &str) -> Option<FieldRef<'_>>;
}

/// Evaluates [`Filter`] trees against [`Filterable`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEvaluator {
    unknown_attribute_policy: UnknownAttributePolicy,
}

impl FilterEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnknownAttributePolicy) -> Self {
        Self {
            unknown_attribute_policy: policy,
        }
    }

    pub fn from_config(config: &PatchConfig) -> Self {
        Self::with_policy(config.unknown_attribute_policy)
    }

    pub fn policy(&self) -> UnknownAttributePolicy {
        self.unknown_attribute_policy
    }

    /// Evaluate `filter` against `record`.
    ///
    /// `And` and `Or` short-circuit, so an illegal expression after the
    /// deciding child is not reported.
    ///
    /// Trees nested deeper than the parser allows fail with `invalidFilter`.
    pub fn evaluate<R>(&self, filter: &Filter, record: &R) -> ScimResult<bool>
    where
        R: Filterable + ?Sized,
    {
        self.evaluate_at(filter, record, 0)
    }

    fn evaluate_at<R>(&self, filter: &Filter, record: &R, depth: usize) -> ScimResult<bool>
    where
        R: Filterable + ?Sized,
    {
        if depth > MAX_TREE_DEPTH {
            return Err(ScimError::invalid_filter("filter nesting too deep"));
        }
        match filter {
            Filter::And(children) => {
                for child in children {
                    if !self.evaluate_at(child, record, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Filter::Or(children) => {
                for child in children {
                    if self.evaluate_at(child, record, depth + 1)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Filter::Not(child) => Ok(!self.evaluate_at(child, record, depth + 1)?),
            Filter::Present(path) => match self.field(record, &path.normalized())? {
                Some(field) => Ok(field.is_assigned()),
                None => Ok(false),
            },
            Filter::Compare { op, path, value } => {
                match self.field(record, &path.normalized())? {
                    Some(field) => compare(*op, field, value),
                    None => Ok(false),
                }
            }
            Filter::StartsWith { path, value } => {
                self.substring(record, &path.normalized(), value, "sw", |a, b| a.starts_with(b))
            }
            Filter::EndsWith { path, value } => {
                self.substring(record, &path.normalized(), value, "ew", |a, b| a.ends_with(b))
            }
            Filter::Contains { path, value } => {
                self.substring(record, &path.normalized(), value, "co", |a, b| a.contains(b))
            }
            Filter::Complex { path, .. } => {
                debug!("Rejecting value path filter on '{}' inside a member filter", path);
                Err(ScimError::invalid_filter(format!(
                    "value path filter '{}' is not supported inside a member filter",
                    path
                )))
            }
        }
    }

    /// Resolve a field, applying the unknown attribute policy.
    fn field<'r, R>(&self, record: &'r R, name: &str) -> ScimResult<Option<FieldRef<'r>>>
    where
        R: Filterable + ?Sized,
    {
        match record.resolve_field(&name.to_ascii_lowercase()) {
            Some(field) => Ok(Some(field)),
            None => match self.unknown_attribute_policy {
                UnknownAttributePolicy::Permissive => {
                    trace!("Unknown filter attribute '{}' evaluates to false", name);
                    Ok(None)
                }
                UnknownAttributePolicy::Strict => Err(ScimError::invalid_filter(format!(
                    "unknown attribute '{}'",
                    name
                ))),
            },
        }
    }

    fn substring<R, F>(
        &self,
        record: &R,
        name: &str,
        literal: &Value,
        operator: &str,
        test: F,
    ) -> ScimResult<bool>
    where
        R: Filterable + ?Sized,
        F: Fn(&str, &str) -> bool,
    {
        let Some(field) = self.field(record, name)? else {
            return Ok(false);
        };
        let FieldRef::String { value, case_exact } = field else {
            return Err(ScimError::invalid_filter(format!(
                "operator '{}' is not supported on {} attribute '{}'",
                operator,
                field.type_name(),
                name
            )));
        };
        let Some(needle) = literal.as_str() else {
            return Err(ScimError::invalid_filter(format!(
                "operator '{}' on '{}' requires a string literal",
                operator, name
            )));
        };
        let Some(haystack) = value.filter(|v| !v.is_empty()) else {
            return Ok(false);
        };

        if case_exact {
            Ok(test(haystack, needle))
        } else {
            Ok(test(&haystack.to_lowercase(), &needle.to_lowercase()))
        }
    }
}

fn compare(op: CompareOp, field: FieldRef<'_>, literal: &Value) -> ScimResult<bool> {
    if literal.is_null() {
        return match op {
            CompareOp::Eq => Ok(!field.is_assigned()),
            CompareOp::Ne => Ok(field.is_assigned()),
            _ => Err(ScimError::invalid_filter(format!(
                "operator '{}' cannot compare against null",
                op
            ))),
        };
    }

    let ordering = match field {
        FieldRef::Integer(value) => {
            let expected = coerce_integer(literal)?;
            value.map(|v| v.cmp(&expected))
        }
        FieldRef::String { value, case_exact } => {
            let expected = literal.as_str().ok_or_else(|| {
                ScimError::invalid_filter(format!("expected a string literal, got {}", literal))
            })?;
            value.filter(|v| !v.is_empty()).map(|v| {
                if case_exact {
                    v.cmp(expected)
                } else {
                    v.to_lowercase().cmp(&expected.to_lowercase())
                }
            })
        }
        FieldRef::Boolean(value) => {
            if op.is_ordering() {
                return Err(ScimError::invalid_filter(format!(
                    "operator '{}' is not supported on boolean attributes",
                    op
                )));
            }
            let expected = coerce_boolean(literal)?;
            value.map(|v| v.cmp(&expected))
        }
        FieldRef::DateTime(value) => {
            let expected = coerce_date_time(literal)?;
            value.map(|v| v.cmp(&expected))
        }
    };

    Ok(match ordering {
        Some(ordering) => matches_ordering(op, ordering),
        // Unassigned fields only satisfy `ne`
        None => op == CompareOp::Ne,
    })
}

fn matches_ordering(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
    }
}

fn coerce_integer(literal: &Value) -> ScimResult<i64> {
    match literal {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ScimError::invalid_filter(format!("expected an integer literal, got {}", literal)))
}

fn coerce_boolean(literal: &Value) -> ScimResult<bool> {
    match literal {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) if text.eq_ignore_ascii_case("true") => Some(true),
        Value::String(text) if text.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
    .ok_or_else(|| ScimError::invalid_filter(format!("expected a boolean literal, got {}", literal)))
}

fn coerce_date_time(literal: &Value) -> ScimResult<DateTime<Utc>> {
    literal
        .as_str()
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok_or_else(|| {
            ScimError::invalid_filter(format!("expected an RFC 3339 dateTime literal, got {}", literal))
        })
}
