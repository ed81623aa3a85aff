//! Injected clock capability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A source of the current time.
///
/// Every time-sensitive component receives an injected `Arc<dyn
/// ClockSource>` rather than reading an ambient clock, so tests can
/// substitute a deterministic implementation.
#[async_trait]
pub trait ClockSource: Send + Sync {
    /// Current time. Must not perform I/O.
    fn now(&self) -> DateTime<Utc>;

    /// Refresh the source's correction if it has gone stale.
    ///
    /// Default is a no-op; the synchronized implementation re-measures its
    /// offset. Failures are swallowed, since a stale correction stays
    /// usable.
    async fn refresh_if_stale(&self) {}
}

/// Uncorrected local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
