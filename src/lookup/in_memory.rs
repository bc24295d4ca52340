//! In-memory principal directory.
//!
//! A thread-safe [`PrincipalLookup`] backed by a `HashMap` behind an `RwLock`.
//! It is intended for tests, examples and tools that do not have a real
//! identity store at hand.

use super::{Principal, PrincipalKind, PrincipalLookup};
use crate::error::{ScimError, ScimResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory principal directory.
///
/// Cloning the directory shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    principals: Arc<RwLock<HashMap<(PrincipalKind, i64), Principal>>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with `principals`.
    pub fn with_principals(principals: impl IntoIterator<Item = Principal>) -> Self {
        let map = principals
            .into_iter()
            .map(|principal| ((principal.kind, principal.id), principal))
            .collect();
        Self {
            principals: Arc::new(RwLock::new(map)),
        }
    }

    /// Insert or overwrite a principal.
    pub fn insert(&self, principal: Principal) -> ScimResult<Option<Principal>> {
        let mut principals = self
            .principals
            .write()
            .map_err(|_| ScimError::internal("principal directory lock poisoned"))?;
        Ok(principals.insert((principal.kind, principal.id), principal))
    }

    /// Remove a principal, returning it if it existed.
    pub fn remove(&self, kind: PrincipalKind, id: i64) -> ScimResult<Option<Principal>> {
        let mut principals = self
            .principals
            .write()
            .map_err(|_| ScimError::internal("principal directory lock poisoned"))?;
        Ok(principals.remove(&(kind, id)))
    }

    /// Number of principals of every kind.
    pub fn len(&self) -> ScimResult<usize> {
        let principals = self
            .principals
            .read()
            .map_err(|_| ScimError::internal("principal directory lock poisoned"))?;
        Ok(principals.len())
    }

    pub fn is_empty(&self) -> ScimResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl PrincipalLookup for InMemoryDirectory {
    fn lookup(&self, kind: PrincipalKind, id: i64) -> ScimResult<Option<Principal>> {
        let principals = self
            .principals
            .read()
            .map_err(|_| ScimError::internal("principal directory lock poisoned"))?;
        Ok(principals.get(&(kind, id)).cloned())
    }
}
