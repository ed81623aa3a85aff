//! Tower/Axum middleware.

pub mod access;
pub mod audit;
pub mod cors;
pub mod logging;
pub mod rbac;
