//! Principal lookup abstraction.
//!
//! Member collections reference principals (users and roles) by id only. The
//! persistence layer that owns those principals is an external collaborator;
//! the engines consume it through the [`PrincipalLookup`] trait.
//!
//! The lookup is responsible for:
//! - Resolving a principal id to its current identity and display name
//! - Reporting absence as `Ok(None)` and backend failures as errors
//!
//! The lookup is NOT responsible for:
//! - Deciding whether an absent principal is an error (the engine maps it to `NotFound`)
//! - Caching across requests
//!
//! # Example Usage
//!
//! ```rust
//! use scim_patch::lookup::{InMemoryDirectory, Principal, PrincipalKind, PrincipalLookup};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = InMemoryDirectory::new();
//! directory.insert(Principal::user(5, "Barbara Jensen"))?;
//!
//! assert!(directory.lookup(PrincipalKind::User, 5)?.is_some());
//! assert!(directory.lookup(PrincipalKind::Role, 5)?.is_none());
//! # Ok(())
//! # }
//! ```

pub mod in_memory;

pub use in_memory::InMemoryDirectory;

use crate::error::{ScimError, ScimResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of principal a member may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalKind {
    User,
    Role,
}

impl PrincipalKind {
    /// The SCIM resource type name used in `NotFound` errors.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Role => "Group",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource_type())
    }
}

/// A resolved principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub kind: PrincipalKind,
    pub id: i64,
    pub display: Option<String>,
}

impl Principal {
    pub fn new(kind: PrincipalKind, id: i64, display: Option<String>) -> Self {
        Self { kind, id, display }
    }

    pub fn user(id: i64, display: impl Into<String>) -> Self {
        Self::new(PrincipalKind::User, id, Some(display.into()))
    }

    pub fn role(id: i64, display: impl Into<String>) -> Self {
        Self::new(PrincipalKind::Role, id, Some(display.into()))
    }
}

/// Resolves principals by id.
pub trait PrincipalLookup {
    /// Look up a principal. Returns `Ok(None)` when no principal of that
    /// kind exists with the id.
    fn lookup(&self, kind: PrincipalKind, id: i64) -> ScimResult<Option<Principal>>;
}

impl<T: PrincipalLookup + ?Sized> PrincipalLookup for &T {
    fn lookup(&self, kind: PrincipalKind, id: i64) -> ScimResult<Option<Principal>> {
        (**self).lookup(kind, id)
    }
}

impl<T: PrincipalLookup + ?Sized> PrincipalLookup for std::sync::Arc<T> {
    fn lookup(&self, kind: PrincipalKind, id: i64) -> ScimResult<Option<Principal>> {
        (**self).lookup(kind, id)
    }
}

/// Look up a principal that must exist.
pub fn require(lookup: &dyn PrincipalLookup, kind: PrincipalKind, id: i64) -> ScimResult<Principal> {
    match lookup.lookup(kind, id)? {
        Some(principal) => Ok(principal),
        None => {
            debug!("{} {} referenced by a member does not exist", kind, id);
            Err(ScimError::not_found(kind.resource_type(), id))
        }
    }
}
