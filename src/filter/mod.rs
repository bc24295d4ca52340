//! SCIM filter expressions and attribute paths.
//!
//! This module provides the filter expression tree used both for standalone
//! SCIM filters (RFC 7644 §3.4.2.2) and for the value selection filters that
//! PATCH paths embed on their first segment (`members[value eq 5]`).
//!
//! # Key Types
//!
//! - [`Filter`] - Recursive boolean expression tree
//! - [`AttributePath`] - Attribute reference with optional schema URN and value filter
//! - [`FilterEvaluator`] - Evaluates a filter against one member record
//! - [`Filterable`] - Field accessor capability a member type exposes to the evaluator
//!
//! # Examples
//!
//! ```rust
//! use scim_patch::filter::Filter;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parsed = Filter::parse(r#"value eq 5 and scope sw "read""#)?;
//! let built = Filter::and(vec![
//!     Filter::eq("value", json!(5)),
//!     Filter::starts_with("scope", "read"),
//! ]);
//! assert_eq!(parsed, built);
//! # Ok(())
//! # }
//! ```

pub mod evaluator;
pub mod parser;

pub use evaluator::{FieldRef, FilterEvaluator, Filterable};
pub use parser::{parse_filter, parse_path};

use crate::error::{ScimError, ScimResult};
use serde_json::Value;
use std::fmt;

/// Deepest `(`, `not (` or `[` nesting the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Comparison operators of the SCIM filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
}

impl CompareOp {
    /// The operator keyword as written in a filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        }
    }

    /// Whether the operator needs an ordered attribute type.
    pub fn is_ordering(&self) -> bool {
        matches!(self, Self::Gt | Self::Ge | Self::Lt | Self::Le)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A SCIM filter expression.
///
/// Filters are immutable once built. They are usually produced by
/// [`Filter::parse`] or by parsing a PATCH path, but the constructor helpers
/// are convenient in tests and in code that builds filters programmatically.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// All children must match; an empty conjunction matches
    And(Vec<Filter>),
    /// Any child must match; an empty disjunction never matches
    Or(Vec<Filter>),
    /// Logical negation
    Not(Box<Filter>),
    /// `path pr`
    Present(AttributePath),
    /// `path op literal`
    Compare {
        op: CompareOp,
        path: AttributePath,
        value: Value,
    },
    /// `path sw literal`
    StartsWith { path: AttributePath, value: Value },
    /// `path ew literal`
    EndsWith { path: AttributePath, value: Value },
    /// `path co literal`
    Contains { path: AttributePath, value: Value },
    /// `path[filter]`
    Complex {
        path: AttributePath,
        filter: Box<Filter>,
    },
}

impl Filter {
    /// Parse a filter string.
    pub fn parse(input: &str) -> ScimResult<Self> {
        parser::parse_filter(input)
    }

    pub fn and(children: Vec<Filter>) -> Self {
        Self::And(children)
    }

    pub fn or(children: Vec<Filter>) -> Self {
        Self::Or(children)
    }

    pub fn not(child: Filter) -> Self {
        Self::Not(Box::new(child))
    }

    pub fn present(path: &str) -> Self {
        Self::Present(AttributePath::attribute(path))
    }

    pub fn compare(op: CompareOp, path: &str, value: impl Into<Value>) -> Self {
        Self::Compare {
            op,
            path: AttributePath::attribute(path),
            value: value.into(),
        }
    }

    pub fn eq(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::Eq, path, value)
    }

    pub fn ne(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::Ne, path, value)
    }

    pub fn gt(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::Gt, path, value)
    }

    pub fn ge(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::Ge, path, value)
    }

    pub fn lt(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::Lt, path, value)
    }

    pub fn le(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(CompareOp::Le, path, value)
    }

    pub fn starts_with(path: &str, value: impl Into<Value>) -> Self {
        Self::StartsWith {
            path: AttributePath::attribute(path),
            value: value.into(),
        }
    }

    pub fn ends_with(path: &str, value: impl Into<Value>) -> Self {
        Self::EndsWith {
            path: AttributePath::attribute(path),
            value: value.into(),
        }
    }

    pub fn contains(path: &str, value: impl Into<Value>) -> Self {
        Self::Contains {
            path: AttributePath::attribute(path),
            value: value.into(),
        }
    }

    pub fn complex(path: &str, filter: Filter) -> Self {
        Self::Complex {
            path: AttributePath::attribute(path),
            filter: Box::new(filter),
        }
    }

    /// The attribute path an attribute expression targets.
    ///
    /// Logical expressions have no single target and return `None`.
    pub fn path(&self) -> Option<&AttributePath> {
        match self {
            Self::And(_) | Self::Or(_) | Self::Not(_) => None,
            Self::Present(path)
            | Self::Compare { path, .. }
            | Self::StartsWith { path, .. }
            | Self::EndsWith { path, .. }
            | Self::Contains { path, .. }
            | Self::Complex { path, .. } => Some(path),
        }
    }

    /// Fails when an empty `And` or `Or` is nested anywhere in the tree.
    /// Those evaluate fine but have no textual form.
    pub fn check_renderable(&self) -> ScimResult<()> {
        match self {
            Self::And(children) | Self::Or(children) if children.is_empty() => Err(
                ScimError::invalid_filter("an empty 'and' or 'or' expression cannot be written as a filter"),
            ),
            Self::And(children) | Self::Or(children) => {
                children.iter().try_for_each(Filter::check_renderable)
            }
            Self::Not(child) => child.check_renderable(),
            Self::Complex { filter, .. } => filter.check_renderable(),
            _ => Ok(()),
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(_) | Self::Or(_) => write!(f, "({})", self),
            _ => write!(f, "{}", self),
        }
    }

    fn fmt_joined(children: &[Filter], keyword: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, child) in children.iter().enumerate() {
            if index > 0 {
                write!(f, " {} ", keyword)?;
            }
            child.fmt_child(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(children) => Self::fmt_joined(children, "and", f),
            Self::Or(children) => Self::fmt_joined(children, "or", f),
            Self::Not(child) => write!(f, "not ({})", child),
            Self::Present(path) => write!(f, "{} pr", path),
            Self::Compare { op, path, value } => write!(f, "{} {} {}", path, op, value),
            Self::StartsWith { path, value } => write!(f, "{} sw {}", path, value),
            Self::EndsWith { path, value } => write!(f, "{} ew {}", path, value),
            Self::Contains { path, value } => write!(f, "{} co {}", path, value),
            Self::Complex { path, filter } => write!(f, "{}[{}]", path, filter),
        }
    }
}

/// One dot-separated segment of an attribute path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    name: String,
    filter: Option<Filter>,
}

impl PathElement {
    pub fn new(name: impl Into<String>, filter: Option<Filter>) -> Self {
        Self {
            name: name.into(),
            filter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }
}

/// A reference to an attribute, as used by PATCH operations and filters.
///
/// A path has an optional schema URN prefix and one or more segments. Only
/// the first segment may carry a value selection filter, e.g.
/// `members[value eq 5]` or `emails[type eq "work"].value`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributePath {
    schema: Option<String>,
    elements: Vec<PathElement>,
}

impl AttributePath {
    /// Build a path from a plain dotted attribute name without parsing filters.
    pub fn attribute(name: &str) -> Self {
        Self {
            schema: None,
            elements: name
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(|segment| PathElement::new(segment, None))
                .collect(),
        }
    }

    /// Build a path from already parsed parts.
    pub fn from_parts(schema: Option<String>, elements: Vec<PathElement>) -> Self {
        Self { schema, elements }
    }

    /// Parse a PATCH path such as `members[value eq 5]`.
    pub fn parse(input: &str) -> ScimResult<Self> {
        parser::parse_path(input)
    }

    /// Attach a value selection filter to the first segment.
    ///
    /// The path must render back to a string [`AttributePath::parse`]
    /// accepts, so a filter containing an empty `And` or `Or` is rejected
    /// with `invalidFilter`.
    pub fn with_filter(mut self, filter: Filter) -> ScimResult<Self> {
        filter.check_renderable()?;
        if let Some(first) = self.elements.first_mut() {
            first.filter = Some(filter);
        }
        Ok(self)
    }

    /// Prefix the path with a schema URN.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// The value selection filter of the first segment, if any.
    pub fn filter(&self) -> Option<&Filter> {
        self.elements.first().and_then(PathElement::filter)
    }

    /// Dot-joined segment names with filters and schema URN stripped.
    pub fn normalized(&self) -> String {
        self.elements
            .iter()
            .map(PathElement::name)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}:", schema)?;
        }
        for (index, element) in self.elements.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(&element.name)?;
            if let Some(filter) = &element.filter {
                write!(f, "[{}]", filter)?;
            }
        }
        Ok(())
    }
}
