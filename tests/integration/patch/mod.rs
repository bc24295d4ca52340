//! SCIM PATCH Operation Integration Tests
//!
//! Covers RFC 7644 §3.5.2 add, replace and remove against every built-in
//! resource type, plus PatchOp message handling.

pub mod add;
pub mod remove;
pub mod requests;
