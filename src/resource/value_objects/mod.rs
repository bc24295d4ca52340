//! Value objects for the members of multi-valued attributes.
//!
//! Each type here is one element of a member collection and implements
//! [`Member`](crate::resource::Member), so the PATCH engine can build it from
//! JSON, compare it by natural key and filter it.
//!
//! ## Usage Pattern
//!
//! ```rust
//! use scim_patch::filter::{Filter, FilterEvaluator};
//! use scim_patch::resource::value_objects::TenantClaim;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let claim = TenantClaim::new(1, Some("Alice".to_string()), Some("read".to_string()));
//! let filter = Filter::parse(r#"value eq 1 and scope eq "READ""#)?;
//! assert!(FilterEvaluator::new().evaluate(&filter, &claim)?);
//! # Ok(())
//! # }
//! ```

mod email_address;
mod group_member;
mod meta;
mod role_assignment;
mod tenant_claim;

pub use email_address::EmailAddress;
pub use group_member::GroupMember;
pub use meta::Meta;
pub use role_assignment::RoleAssignment;
pub use tenant_claim::TenantClaim;

/// Member type every principal reference must carry when it names one.
pub const USER_MEMBER_TYPE: &str = "User";
