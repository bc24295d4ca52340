//! SCIM 2.0 PATCH merge and filter engine for Rust.
//!
//! Applies RFC 7644 §3.5.2 PATCH operations and PUT-style merges to identity
//! governance entities (users, roles exposed as groups, and tenants), with
//! per-resource attribute whitelists and an RFC 7644 §3.4.2.2 filter
//! evaluator for selecting members of multi-valued attributes.
//!
//! # Core Components
//!
//! - [`PatchEngine`] - Applies add/replace/remove operations to an entity
//! - [`EntityMerger`] - Merges an inbound representation over an entity
//! - [`FilterEvaluator`] - Evaluates a [`Filter`] against one member record
//! - [`SchemaRegistry`] - Mutable, operational and searchable attribute tables
//! - [`PrincipalLookup`] - Trait the persistence layer implements to resolve members
//!
//! # Quick Start
//!
//! ```rust
//! use scim_patch::{InMemoryDirectory, PatchEngine, PatchOperation, Principal, SchemaRegistry};
//! use scim_patch::resource::Tenant;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let directory = InMemoryDirectory::with_principals([Principal::user(1, "Alice")]);
//! let engine = PatchEngine::new(registry.tenant_schema(), &directory);
//!
//! let mut tenant = Tenant::new(42);
//! let op = PatchOperation::add(
//!     "roles",
//!     serde_json::json!([{"value": 1, "type": "User", "scope": "read"}]),
//! )?;
//! assert!(engine.apply(&mut tenant, &op)?.is_modified());
//! assert_eq!(tenant.claims()[0].display_name(), Some("Alice"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod merge;
pub mod patch;
pub mod resource;
pub mod schema;

// Re-export commonly used types for convenience
pub use config::{PatchConfig, UnknownAttributePolicy};
pub use error::{BuildError, BuildResult, ScimError, ScimResult};
pub use filter::{AttributePath, Filter, FilterEvaluator, Filterable};
pub use lookup::{InMemoryDirectory, Principal, PrincipalKind, PrincipalLookup};
pub use merge::{EntityMerger, GroupResource, Representation, TenantResource, UserResource};
pub use patch::{Change, PatchEngine, PatchOpType, PatchOperation, PatchRequest};
pub use resource::{EntityVersion, Role, ScimEntity, Tenant, User};
pub use schema::{AttributeSchema, ResourceType, SchemaRegistry};
