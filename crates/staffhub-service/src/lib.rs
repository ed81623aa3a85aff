//! # staffhub-service
//!
//! Application services composing the access core for the HTTP layer:
//! the request context, manager session views with derived presence, and
//! best-effort audit recording.

pub mod audit;
pub mod context;
pub mod session;

pub use context::RequestContext;
