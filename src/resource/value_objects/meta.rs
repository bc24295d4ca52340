//! Meta value object for server-managed resource metadata.
//!
//! Timestamps are owned by the persistence layer. The engines never change
//! them; a caller that persists a modified entity calls [`Meta::touch`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-managed metadata shared by every entity (RFC 7643 §3.1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Meta {
    /// Metadata for an entity created at `created`.
    pub fn new(created: DateTime<Utc>) -> Self {
        Self {
            created: Some(created),
            last_modified: Some(created),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Record a modification at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = Some(now);
    }
}
