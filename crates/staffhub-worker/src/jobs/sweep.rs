//! Out-of-window session sweep.

use std::sync::Arc;

use tracing::{debug, error};

use staffhub_access::guard::AccessGuard;

/// Closes active sessions whose access window has already ended.
///
/// The per-session watcher handles the common case; this sweep catches
/// sessions whose watcher died with the process or whose client vanished
/// without a beacon.
#[derive(Debug, Clone)]
pub struct WindowSweepJob {
    guard: Arc<AccessGuard>,
}

impl WindowSweepJob {
    /// Create a new sweep job.
    pub fn new(guard: Arc<AccessGuard>) -> Self {
        Self { guard }
    }

    /// Run one sweep cycle.
    pub async fn run(&self) {
        match self.guard.sweep().await {
            Ok(closed) => {
                if closed > 0 {
                    debug!(closed = closed, "Window sweep cycle complete");
                }
            }
            Err(e) => {
                error!(error = %e, "Window sweep failed");
            }
        }
    }
}
