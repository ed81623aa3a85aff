//! Audit domain entities.

pub mod model;

pub use model::{AuditRecord, CreateAuditRecord};
