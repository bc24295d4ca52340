//! Attribute schema tables for SCIM resources.
//!
//! This module maps the attribute names SCIM clients use to the fields of the
//! entity model, and decides which of them a PATCH operation may touch.
//!
//! # Key Types
//!
//! - [`AttributeSchema`] - Operational, mutable and searchable tables for one resource type
//! - [`SchemaRegistry`] - The built-in tables for User, Group and Tenant
//! - [`AttributeDescriptor`] - External name, internal key and value shape of one attribute
//!
//! # Examples
//!
//! ```rust
//! use scim_patch::filter::AttributePath;
//! use scim_patch::schema::{ResourceType, SchemaRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let tenant = registry.get(ResourceType::Tenant);
//!
//! let descriptor = tenant.resolve_mutable(&AttributePath::parse("DisplayName")?)?;
//! assert_eq!(descriptor.internal_key, "name");
//! assert!(tenant.resolve_mutable(&AttributePath::parse("meta.version")?).is_err());
//! # Ok(())
//! # }
//! ```

pub mod embedded;
pub mod registry;
pub mod table;
pub mod types;


pub use registry::SchemaRegistry;
pub use table::{AttributeSchema, AttributeSchemaBuilder};
pub use types::{AttributeDescriptor, AttributeKind, Mutability, ResourceType};
