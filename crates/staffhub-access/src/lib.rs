//! # staffhub-access
//!
//! The time-gated access control core: clock synchronization against an
//! authoritative time source, the pure access-window policy, the session
//! lifecycle manager, the per-session enforcement guard, and identity
//! token validation.

pub mod clock;
pub mod guard;
pub mod identity;
pub mod session;
pub mod window;

pub use clock::{ClockSource, ClockSynchronizer, SystemClock};
pub use guard::AccessGuard;
pub use session::{SessionControl, SessionManager};
pub use window::{AccessWindow, WindowDecision};
