//! Content-derived entity versions.
//!
//! An [`EntityVersion`] is computed deterministically from an entity's
//! canonical JSON using SHA-256, so two snapshots with the same content have
//! the same version. Comparing the version before and after a PATCH request
//! tells the persistence layer whether anything changed (RFC 7644 §3.5.2),
//! and the weak ETag form serves HTTP conditional requests (RFC 7232).
//!
//! # Basic Usage
//!
//! ```rust
//! use scim_patch::resource::{EntityVersion, Role};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let role = Role::new(1).with_display_name("Ops");
//! let version = EntityVersion::of(&role)?;
//!
//! // Weak ETag for response headers
//! let etag = version.to_etag();
//! assert!(etag.starts_with("W/\""));
//!
//! // Parse a client-provided If-Match header
//! let parsed: EntityVersion = etag.parse()?;
//! assert_eq!(parsed, version);
//! # Ok(())
//! # }
//! ```

use crate::error::{ScimError, ScimResult};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Opaque version of an entity snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityVersion {
    opaque: String,
}

impl EntityVersion {
    /// Version of arbitrary content.
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        let hash = hasher.finalize();
        // First 8 bytes keep ETags short
        Self {
            opaque: BASE64.encode(&hash[..8]),
        }
    }

    /// Version of an entity's canonical JSON form.
    pub fn of<T: Serialize + ?Sized>(entity: &T) -> ScimResult<Self> {
        // Value maps are key-ordered, which makes the encoding canonical
        let value = serde_json::to_value(entity)
            .map_err(|e| ScimError::internal(format!("entity is not serializable: {}", e)))?;
        let bytes = serde_json::to_vec(&value)
            .map_err(|e| ScimError::internal(format!("entity is not serializable: {}", e)))?;
        Ok(Self::from_content(&bytes))
    }

    /// Wrap a version string from another source, e.g. a database sequence.
    pub fn from_hash(hash: impl AsRef<str>) -> Self {
        Self {
            opaque: hash.as_ref().to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.opaque
    }

    /// Render as a weak ETag: `W/"<opaque>"`.
    pub fn to_etag(&self) -> String {
        format!("W/\"{}\"", self.opaque)
    }

    /// Parse an ETag header value. Weak and strong forms are accepted.
    pub fn parse_etag(etag: &str) -> Result<Self, VersionError> {
        let trimmed = etag.trim();
        let quoted = trimmed.strip_prefix("W/").unwrap_or(trimmed);
        let opaque = quoted
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(|| VersionError::InvalidEtagFormat(etag.to_string()))?;

        if opaque.is_empty() {
            return Err(VersionError::InvalidEtagFormat(etag.to_string()));
        }
        Ok(Self::from_hash(opaque))
    }
}

impl fmt::Display for EntityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.opaque)
    }
}

impl FromStr for EntityVersion {
    type Err = VersionError;

    /// Accepts both the ETag form and the raw opaque form.
    fn from_str(version_str: &str) -> Result<Self, Self::Err> {
        let trimmed = version_str.trim();
        if trimmed.is_empty() {
            return Err(VersionError::ParseError(
                "Version string cannot be empty".to_string(),
            ));
        }
        if trimmed.starts_with("W/") || trimmed.starts_with('"') {
            Self::parse_etag(trimmed)
        } else {
            Ok(Self::from_hash(trimmed))
        }
    }
}

/// Errors that can occur when parsing versions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VersionError {
    #[error("Invalid ETag format: {0}")]
    InvalidEtagFormat(String),

    #[error("Version parse error: {0}")]
    ParseError(String),
}
