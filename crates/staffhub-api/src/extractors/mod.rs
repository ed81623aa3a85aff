//! Request extractors.

pub mod identity;
pub mod pagination;

pub use identity::AuthUser;
pub use pagination::PaginationParams;
