//! Clock synchronization against an authoritative time source.

pub mod source;
pub mod sync;

pub use source::{ClockSource, SystemClock};
pub use sync::{ClockOffset, ClockSynchronizer};
