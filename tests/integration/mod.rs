//! Integration Tests for the SCIM PATCH Engine
//!
//! ## Test Organization
//!
//! - `patch/` - PATCH semantics per RFC 7644 §3.5.2, one module per concern
//! - `filter` - member filter parsing and evaluation per RFC 7644 §3.4.2.2
//! - `merge` - PUT-style merge of inbound representations
//! - `errors` - RFC 7644 §3.12 error responses produced by failing operations
//!
//! ## Test Principles
//!
//! 1. **Atomicity**: every failing operation is checked to leave the entity unchanged
//! 2. **Error kinds**: failures are asserted by `scimType`, not by message text
//! 3. **Public API only**: tests go through the same entry points a service would

pub mod errors;
pub mod filter;
pub mod merge;
pub mod patch;
