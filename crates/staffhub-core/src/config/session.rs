//! Session tracking configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle and presence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes since login within which an active session derives as online.
    #[serde(default = "default_presence_recency")]
    pub presence_recency_minutes: u64,
    /// Trailing window for the average-duration summary aggregate, in days.
    #[serde(default = "default_summary_window")]
    pub summary_window_days: u64,
    /// Advertised concurrent-session limit per user.
    ///
    /// Surfaced to clients as a policy value; the lifecycle logic does not
    /// enforce it.
    #[serde(default = "default_concurrent_limit")]
    pub concurrent_limit: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            presence_recency_minutes: default_presence_recency(),
            summary_window_days: default_summary_window(),
            concurrent_limit: default_concurrent_limit(),
        }
    }
}

fn default_presence_recency() -> u64 {
    15
}

fn default_summary_window() -> u64 {
    7
}

fn default_concurrent_limit() -> u32 {
    3
}
