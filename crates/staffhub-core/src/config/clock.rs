//! Clock synchronization configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the authoritative time source round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// URL of the authoritative time source.
    pub time_source_url: String,
    /// Interval between background resynchronizations, in seconds.
    #[serde(default = "default_resync_interval")]
    pub resync_interval_seconds: u64,
    /// Timeout applied to the round-trip request, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_millis: u64,
}

fn default_resync_interval() -> u64 {
    300
}

fn default_request_timeout() -> u64 {
    3000
}
