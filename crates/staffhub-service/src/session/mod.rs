//! Session viewing services.

pub mod service;

pub use service::{SessionService, SessionWithPresence};
