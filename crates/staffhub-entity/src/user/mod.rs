//! Staff identity types.
//!
//! The user entity itself (credentials, profile, status) lives in the
//! external identity collaborator; this application only needs the role.

pub mod role;

pub use role::StaffRole;
