//! Multi-valued member collections.
//!
//! A [`Member`] is one element of a multi-valued relationship attribute such
//! as `members` or `roles`. Every `Vec<M>` of members is a
//! [`MemberCollection`], the object-safe view the PATCH engine mutates.
//!
//! Every mutation builds or evaluates everything it needs before touching the
//! collection, so a failing element leaves the collection as it was.

use crate::error::{ScimError, ScimResult};
use crate::filter::{Filter, FilterEvaluator, Filterable};
use crate::lookup::PrincipalLookup;
use log::trace;
use serde_json::{Map, Value};
use std::fmt;

/// One element of a multi-valued attribute.
pub trait Member: Filterable + Clone + PartialEq + fmt::Debug {
    /// External attribute name of the collection, used in error messages.
    const ATTRIBUTE: &'static str;

    /// Build a member from its JSON form, resolving referenced principals.
    fn from_json(value: &Value, lookup: &dyn PrincipalLookup) -> ScimResult<Self>;

    /// Whether two members denote the same relationship.
    fn same_member(&self, other: &Self) -> bool;
}

/// Object-safe mutation interface over a member collection.
///
/// Methods returning `bool` report whether the collection changed.
pub trait MemberCollection {
    /// External attribute name of the collection.
    fn attribute(&self) -> &'static str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the members of `values` that are not already present.
    fn add_values(&mut self, values: &[Value], lookup: &dyn PrincipalLookup) -> ScimResult<bool>;

    /// Replace the whole collection by the members of `values`.
    fn replace_values(&mut self, values: &[Value], lookup: &dyn PrincipalLookup)
    -> ScimResult<bool>;

    /// Replace the members matching `filter` by the members of `values`,
    /// placed where the first match was. Fails with `noTarget` when nothing
    /// matches.
    fn replace_matching(
        &mut self,
        filter: &Filter,
        evaluator: &FilterEvaluator,
        values: &[Value],
        lookup: &dyn PrincipalLookup,
    ) -> ScimResult<bool>;

    /// Remove the members matching `filter`, returning how many were removed.
    fn remove_matching(&mut self, filter: &Filter, evaluator: &FilterEvaluator)
    -> ScimResult<usize>;

    /// Remove every member.
    fn clear(&mut self) -> bool;
}

impl<M: Member> MemberCollection for Vec<M> {
    fn attribute(&self) -> &'static str {
        M::ATTRIBUTE
    }

    fn len(&self) -> usize {
        <[M]>::len(self)
    }

    fn add_values(&mut self, values: &[Value], lookup: &dyn PrincipalLookup) -> ScimResult<bool> {
        let incoming = build_members::<M>(values, lookup)?;
        let before = self.len();
        for member in incoming {
            if !self.iter().any(|existing| existing.same_member(&member)) {
                self.push(member);
            }
        }
        trace!("Added {} new {} entries", self.len() - before, M::ATTRIBUTE);
        Ok(self.len() != before)
    }

    fn replace_values(
        &mut self,
        values: &[Value],
        lookup: &dyn PrincipalLookup,
    ) -> ScimResult<bool> {
        let replacement = build_members::<M>(values, lookup)?;
        if *self == replacement {
            return Ok(false);
        }
        *self = replacement;
        Ok(true)
    }

    fn replace_matching(
        &mut self,
        filter: &Filter,
        evaluator: &FilterEvaluator,
        values: &[Value],
        lookup: &dyn PrincipalLookup,
    ) -> ScimResult<bool> {
        let matches = evaluate_all(self, filter, evaluator)?;
        let Some(first_match) = matches.iter().position(|matched| *matched) else {
            return Err(ScimError::no_target(format!(
                "no {} entry matches '{}'",
                M::ATTRIBUTE,
                filter
            )));
        };
        let replacements = build_members::<M>(values, lookup)?;

        let kept: Vec<&M> = self
            .iter()
            .zip(&matches)
            .filter(|(_, matched)| !**matched)
            .map(|(member, _)| member)
            .collect();

        let mut result = Vec::with_capacity(kept.len() + replacements.len());
        for (index, (member, matched)) in self.iter().zip(&matches).enumerate() {
            if index == first_match {
                result.extend(
                    replacements
                        .iter()
                        .filter(|r| !kept.iter().any(|k| k.same_member(r)))
                        .cloned(),
                );
            }
            if !matched {
                result.push(member.clone());
            }
        }

        if *self == result {
            return Ok(false);
        }
        *self = result;
        Ok(true)
    }

    fn remove_matching(
        &mut self,
        filter: &Filter,
        evaluator: &FilterEvaluator,
    ) -> ScimResult<usize> {
        let matches = evaluate_all(self, filter, evaluator)?;
        let mut flags = matches.iter();
        let before = self.len();
        self.retain(|_| !flags.next().copied().unwrap_or(false));
        let removed = before - self.len();
        trace!("Removed {} {} entries matching '{}'", removed, M::ATTRIBUTE, filter);
        Ok(removed)
    }

    fn clear(&mut self) -> bool {
        let changed = !self.is_empty();
        Vec::clear(self);
        changed
    }
}

/// Build every member of `values` before any of them is used, dropping
/// duplicates by natural key. The first occurrence wins.
pub fn build_members<M: Member>(
    values: &[Value],
    lookup: &dyn PrincipalLookup,
) -> ScimResult<Vec<M>> {
    let mut members: Vec<M> = Vec::with_capacity(values.len());
    for value in values {
        let member = M::from_json(value, lookup)?;
        if !members.iter().any(|existing| existing.same_member(&member)) {
            members.push(member);
        }
    }
    Ok(members)
}

fn evaluate_all<M: Member>(
    members: &[M],
    filter: &Filter,
    evaluator: &FilterEvaluator,
) -> ScimResult<Vec<bool>> {
    members
        .iter()
        .map(|member| evaluator.evaluate(filter, member))
        .collect()
}

/// The JSON object of one member.
pub(crate) fn member_object<'a>(
    attribute: &str,
    value: &'a Value,
) -> ScimResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        ScimError::invalid_value(format!(
            "each {} entry must be a JSON object, got {}",
            attribute, value
        ))
    })
}

/// Look up a sub-attribute. SCIM attribute names are case-insensitive.
fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

/// The required integer `value` of a member that references a principal.
/// Numeric strings are accepted.
pub(crate) fn principal_id(attribute: &str, object: &Map<String, Value>) -> ScimResult<i64> {
    match field(object, "value") {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        ScimError::invalid_value(format!(
            "{} entry requires an integer 'value' identifier",
            attribute
        ))
    })
}

pub(crate) fn optional_string(
    attribute: &str,
    object: &Map<String, Value>,
    name: &str,
) -> ScimResult<Option<String>> {
    match field(object, name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(ScimError::invalid_value(format!(
            "{}.{} must be a string, got {}",
            attribute, name, other
        ))),
    }
}

pub(crate) fn optional_bool(
    attribute: &str,
    object: &Map<String, Value>,
    name: &str,
) -> ScimResult<Option<bool>> {
    match field(object, name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(other) => Err(ScimError::invalid_value(format!(
            "{}.{} must be a boolean, got {}",
            attribute, name, other
        ))),
    }
}
