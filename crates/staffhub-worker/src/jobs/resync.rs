//! Periodic clock resynchronization.

use std::sync::Arc;

use tracing::{debug, warn};

use staffhub_access::clock::ClockSynchronizer;

/// Re-measures the clock offset on a fixed interval, process-wide.
///
/// Failures leave the last-known-good offset in place; `now()` keeps
/// working in degraded mode on the local clock.
#[derive(Debug, Clone)]
pub struct ClockResyncJob {
    clock: Arc<ClockSynchronizer>,
}

impl ClockResyncJob {
    /// Create a new resync job.
    pub fn new(clock: Arc<ClockSynchronizer>) -> Self {
        Self { clock }
    }

    /// Run one resynchronization.
    pub async fn run(&self) {
        match self.clock.sync().await {
            Ok(_) => {
                if let Some(measurement) = self.clock.current_offset() {
                    debug!(
                        offset_millis = measurement.offset_millis,
                        "Clock resynchronized"
                    );
                }
            }
            Err(e) => {
                warn!(error = %e, "Clock resync failed; continuing on last-known offset");
            }
        }
    }
}
