//! Access window configuration.

use serde::{Deserialize, Serialize};

/// Daily access window configuration.
///
/// Non-privileged staff may only hold an authenticated session while the
/// deployment's local civil time falls inside `[window_start, window_end]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Window start, `"HH:MM"` in local civil time.
    #[serde(default = "default_window_start")]
    pub window_start: String,
    /// Window end, `"HH:MM"` in local civil time.
    #[serde(default = "default_window_end")]
    pub window_end: String,
    /// Deployment's fixed UTC offset in minutes (e.g. `420` for UTC+7).
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// How often the guard re-evaluates an open session, in seconds.
    #[serde(default = "default_recheck_interval")]
    pub recheck_interval_seconds: u64,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            window_start: default_window_start(),
            window_end: default_window_end(),
            utc_offset_minutes: 0,
            recheck_interval_seconds: default_recheck_interval(),
        }
    }
}

fn default_window_start() -> String {
    "05:30".to_string()
}

fn default_window_end() -> String {
    "21:30".to_string()
}

fn default_recheck_interval() -> u64 {
    60
}
