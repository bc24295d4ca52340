//! Per resource type attribute tables.
//!
//! An [`AttributeSchema`] is built once through [`AttributeSchemaBuilder`] and
//! is immutable afterwards. It derives three lookup tables keyed by the lower
//! cased external name:
//!
//! - operational attributes, which are read-only
//! - mutable attributes, which PATCH may target
//! - searchable attributes, which filters may reference
//!
//! Every attribute belongs to one declared schema URN. A URN-prefixed path
//! only resolves when the prefix names the attribute's own schema.

use super::types::{AttributeDescriptor, AttributeKind, Mutability, ResourceType};
use crate::error::{BuildError, BuildResult, ScimError, ScimResult};
use crate::filter::AttributePath;
use log::trace;
use std::collections::HashMap;

/// Path resolution tables for one resource type.
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    resource_type: ResourceType,
    schema_uris: Vec<String>,
    operational: HashMap<String, AttributeDescriptor>,
    mutable: HashMap<String, AttributeDescriptor>,
    searchable: HashMap<String, String>,
    /// Index into `schema_uris` of the schema owning each attribute
    owners: HashMap<String, usize>,
}

impl AttributeSchema {
    /// Start a table for `resource_type`.
    pub fn builder(resource_type: ResourceType) -> AttributeSchemaBuilder {
        AttributeSchemaBuilder {
            resource_type,
            schema_uris: Vec::new(),
            current_schema: 0,
            attributes: Vec::new(),
            search_only: Vec::new(),
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Schema URNs a path prefix may name.
    pub fn schema_uris(&self) -> &[String] {
        &self.schema_uris
    }

    /// Resolve a PATCH target to its descriptor.
    ///
    /// Fails with `invalidPath` when the path names an unknown schema URN, a
    /// URN other than the attribute's own, an unknown attribute, or a
    /// read-only attribute.
    pub fn resolve_mutable(&self, path: &AttributePath) -> ScimResult<&AttributeDescriptor> {
        let key = path.normalized().to_ascii_lowercase();
        self.check_schema_uri(path, &key)?;

        if let Some(descriptor) = self.mutable.get(&key) {
            trace!(
                "Resolved {} path '{}' to '{}'",
                self.resource_type, path, descriptor.internal_key
            );
            return Ok(descriptor);
        }
        if self.operational.contains_key(&key) {
            return Err(ScimError::invalid_path(
                path.to_string(),
                "attribute is read-only",
            ));
        }
        Err(ScimError::invalid_path(
            path.to_string(),
            format!("no such mutable attribute on {}", self.resource_type),
        ))
    }

    /// Resolve a filter attribute to the entity key it searches.
    pub fn resolve_searchable(&self, path: &AttributePath) -> ScimResult<&str> {
        let key = path.normalized().to_ascii_lowercase();
        self.check_schema_uri(path, &key)?;
        self.searchable
            .get(&key)
            .map(String::as_str)
            .ok_or_else(|| {
                ScimError::invalid_path(
                    path.to_string(),
                    format!("attribute is not searchable on {}", self.resource_type),
                )
            })
    }

    /// Mutable attributes in no particular order.
    pub fn mutable_attributes(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.mutable.values()
    }

    /// Operational attributes in no particular order.
    pub fn operational_attributes(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.operational.values()
    }

    /// The schema URN owning the attribute stored under `key`.
    fn owner(&self, key: &str) -> Option<&str> {
        self.owners
            .get(key)
            .and_then(|index| self.schema_uris.get(*index))
            .map(String::as_str)
    }

    fn check_schema_uri(&self, path: &AttributePath, key: &str) -> ScimResult<()> {
        let Some(uri) = path.schema() else {
            return Ok(());
        };
        if !self.schema_uris.iter().any(|u| u.eq_ignore_ascii_case(uri)) {
            return Err(ScimError::invalid_path(
                path.to_string(),
                format!("schema '{}' is not defined for {}", uri, self.resource_type),
            ));
        }
        match self.owner(key) {
            Some(owner) if !owner.eq_ignore_ascii_case(uri) => Err(ScimError::invalid_path(
                path.to_string(),
                format!("attribute is defined in schema '{}'", owner),
            )),
            _ => Ok(()),
        }
    }
}

/// Builder for [`AttributeSchema`].
#[derive(Debug, Clone)]
pub struct AttributeSchemaBuilder {
    resource_type: ResourceType,
    schema_uris: Vec<String>,
    current_schema: usize,
    attributes: Vec<(AttributeDescriptor, usize)>,
    search_only: Vec<(String, String, usize)>,
}

impl AttributeSchemaBuilder {
    /// Declare the core schema URN. Attributes declared before any
    /// [`extension`](Self::extension) belong to it.
    pub fn schema_uri(mut self, uri: impl Into<String>) -> Self {
        self.schema_uris.push(uri.into());
        self
    }

    /// Declare an extension schema URN. Attributes declared after this call
    /// belong to the extension.
    pub fn extension(mut self, uri: impl Into<String>) -> Self {
        self.schema_uris.push(uri.into());
        self.current_schema = self.schema_uris.len() - 1;
        self
    }

    /// Declare a read-only, server-managed attribute.
    pub fn operational(mut self, name: &str, internal_key: &str, kind: AttributeKind) -> Self {
        self.attributes.push((
            AttributeDescriptor::new(name, internal_key, kind, Mutability::ReadOnly),
            self.current_schema,
        ));
        self
    }

    /// Declare an attribute PATCH may target.
    pub fn mutable(mut self, name: &str, internal_key: &str, kind: AttributeKind) -> Self {
        self.attributes.push((
            AttributeDescriptor::new(name, internal_key, kind, Mutability::ReadWrite),
            self.current_schema,
        ));
        self
    }

    /// Declare a path that is only valid inside filters, e.g. `members.value`.
    pub fn searchable(mut self, name: &str, internal_key: &str) -> Self {
        self.search_only
            .push((name.to_string(), internal_key.to_string(), self.current_schema));
        self
    }

    /// Validate the declarations and derive the lookup tables.
    pub fn build(self) -> BuildResult<AttributeSchema> {
        let resource_type = self.resource_type.to_string();
        if self.schema_uris.is_empty() {
            return Err(BuildError::MissingSchemaUri { resource_type });
        }

        let mut operational = HashMap::new();
        let mut mutable = HashMap::new();
        let mut searchable = HashMap::new();
        let mut owners = HashMap::new();

        for (descriptor, owner) in self.attributes {
            if descriptor.external_name.is_empty() || descriptor.internal_key.is_empty() {
                return Err(BuildError::EmptyAttribute { resource_type });
            }
            let key = descriptor.external_name.to_ascii_lowercase();
            if searchable.contains_key(&key) {
                return Err(BuildError::DuplicateAttribute {
                    resource_type,
                    name: descriptor.external_name,
                });
            }
            searchable.insert(key.clone(), descriptor.internal_key.clone());
            owners.insert(key.clone(), owner);
            match descriptor.mutability {
                Mutability::ReadOnly => operational.insert(key, descriptor),
                Mutability::ReadWrite => mutable.insert(key, descriptor),
            };
        }

        for (name, internal_key, owner) in self.search_only {
            if name.is_empty() || internal_key.is_empty() {
                return Err(BuildError::EmptyAttribute { resource_type });
            }
            let key = name.to_ascii_lowercase();
            if searchable.contains_key(&key) {
                return Err(BuildError::DuplicateAttribute { resource_type, name });
            }
            searchable.insert(key.clone(), internal_key);
            owners.insert(key, owner);
        }

        Ok(AttributeSchema {
            resource_type: self.resource_type,
            schema_uris: self.schema_uris,
            operational,
            mutable,
            searchable,
            owners,
        })
    }
}
