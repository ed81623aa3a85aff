//! Built-in scheduled job implementations.

pub mod resync;
pub mod sweep;

pub use resync::ClockResyncJob;
pub use sweep::WindowSweepJob;
