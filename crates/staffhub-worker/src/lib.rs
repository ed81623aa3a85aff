//! # staffhub-worker
//!
//! Scheduled background tasks for StaffHub:
//! - an out-of-window session sweep (safety net for clients that vanished
//!   without a close beacon)
//! - periodic clock resynchronization against the time source

pub mod jobs;
pub mod scheduler;

pub use scheduler::CronScheduler;
