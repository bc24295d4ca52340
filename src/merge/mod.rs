//! PUT-style merging of inbound representations.
//!
//! An inbound representation ([`UserResource`], [`GroupResource`],
//! [`TenantResource`]) carries only the fields a client sent. Merging it over
//! an entity overwrites every field that is present and leaves absent fields
//! untouched:
//!
//! - scalar fields are overwritten
//! - `emails` are replaced by type: for every type present in the inbound
//!   emails, the existing emails of that type are replaced; other types stay
//! - `members`, `roles` and tenant claims are replaced wholesale, with every
//!   referenced principal resolved through the [`PrincipalLookup`]
//!
//! The merge works on a copy of the entity, so a failure (for example a
//! member referencing a principal that does not exist) leaves the caller's
//! entity as it was.
//!
//! # Example
//!
//! ```rust
//! use scim_patch::lookup::{InMemoryDirectory, Principal};
//! use scim_patch::merge::{EntityMerger, GroupResource};
//! use scim_patch::resource::Role;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = InMemoryDirectory::with_principals([Principal::user(5, "Eve")]);
//! let merger = EntityMerger::new(&directory);
//!
//! let role = Role::new(10).with_display_name("Ops").with_description("On call");
//! let inbound = GroupResource::from_json(&json!({
//!     "displayName": "Ops Team",
//!     "members": [{"value": 5}]
//! }))?;
//!
//! let merged = merger.merge(&role, &inbound)?;
//! assert_eq!(merged.display_name(), Some("Ops Team"));
//! assert_eq!(merged.description.as_deref(), Some("On call"));
//! assert_eq!(merged.members()[0].display_name(), Some("Eve"));
//! # Ok(())
//! # }
//! ```

pub mod representations;

pub use representations::{EnterpriseUserExtension, GroupResource, TenantResource, UserResource};

use crate::error::ScimResult;
use crate::lookup::PrincipalLookup;
use crate::resource::ScimEntity;
use log::debug;

/// An inbound representation that can be merged over its entity type.
pub trait Representation {
    type Entity: ScimEntity;

    /// Overwrite the fields of `entity` this representation carries.
    ///
    /// Implementations may leave `entity` partially merged on error; the
    /// [`EntityMerger`] only ever hands them a copy.
    fn merge_into(
        &self,
        entity: &mut Self::Entity,
        lookup: &dyn PrincipalLookup,
    ) -> ScimResult<()>;
}

/// Merges inbound representations over existing entities.
pub struct EntityMerger<'a> {
    lookup: &'a dyn PrincipalLookup,
}

impl<'a> EntityMerger<'a> {
    pub fn new(lookup: &'a dyn PrincipalLookup) -> Self {
        Self { lookup }
    }

    /// Return `entity` with `representation` merged over it.
    pub fn merge<R: Representation>(
        &self,
        entity: &R::Entity,
        representation: &R,
    ) -> ScimResult<R::Entity> {
        let mut merged = entity.clone();
        representation.merge_into(&mut merged, self.lookup)?;
        debug!(
            "Merged representation into {} {}",
            merged.resource_type(),
            merged.id()
        );
        Ok(merged)
    }
}
