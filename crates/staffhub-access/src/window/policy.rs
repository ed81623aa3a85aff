//! Pure access-window policy.

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use serde::Serialize;

use staffhub_core::config::access::AccessConfig;
use staffhub_core::error::AppError;
use staffhub_core::result::AppResult;

use staffhub_entity::user::StaffRole;

/// Outcome of evaluating the window at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowDecision {
    /// Whether interactive access is permitted right now.
    pub allowed: bool,
    /// Milliseconds until the next window opens. `0` while allowed.
    pub ms_until_next_window: i64,
    /// Milliseconds until the current window ends. `0` while denied, and
    /// `0` for roles that bypass the window (no deadline to arm).
    pub ms_until_window_end: i64,
}

/// The daily recurring interval during which non-privileged access is
/// permitted, in the deployment's local civil time.
///
/// Evaluation is pure: no side effects and no system clock reads — the
/// caller supplies `now`.
#[derive(Debug, Clone, Copy)]
pub struct AccessWindow {
    start: NaiveTime,
    end: NaiveTime,
    utc_offset: FixedOffset,
}

impl AccessWindow {
    /// Build the window from configuration, validating the time strings and
    /// ordering.
    pub fn from_config(config: &AccessConfig) -> AppResult<Self> {
        let start = parse_window_time(&config.window_start)?;
        let end = parse_window_time(&config.window_end)?;

        if start >= end {
            return Err(AppError::configuration(format!(
                "Access window start ({start}) must be before end ({end})"
            )));
        }

        let utc_offset = FixedOffset::east_opt(config.utc_offset_minutes * 60).ok_or_else(|| {
            AppError::configuration(format!(
                "Invalid UTC offset: {} minutes",
                config.utc_offset_minutes
            ))
        })?;

        Ok(Self {
            start,
            end,
            utc_offset,
        })
    }

    /// Construct directly. Useful for tests and embedded policies.
    pub fn new(start: NaiveTime, end: NaiveTime, utc_offset: FixedOffset) -> Self {
        Self {
            start,
            end,
            utc_offset,
        }
    }

    /// The deployment's fixed UTC offset.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Evaluate the window at `now` for `role`.
    ///
    /// Both boundaries are inclusive. Privileged roles always evaluate as
    /// allowed with no deadline.
    pub fn evaluate(&self, now: DateTime<Utc>, role: StaffRole) -> WindowDecision {
        if role.bypasses_window() {
            return WindowDecision {
                allowed: true,
                ms_until_next_window: 0,
                ms_until_window_end: 0,
            };
        }

        let local = now.with_timezone(&self.utc_offset);
        let now_naive = local.naive_local();
        let date = local.date_naive();
        let time = local.time();

        if time >= self.start && time <= self.end {
            let window_end = date.and_time(self.end);
            WindowDecision {
                allowed: true,
                ms_until_next_window: 0,
                ms_until_window_end: (window_end - now_naive).num_milliseconds(),
            }
        } else if time < self.start {
            let next_start = date.and_time(self.start);
            WindowDecision {
                allowed: false,
                ms_until_next_window: (next_start - now_naive).num_milliseconds(),
                ms_until_window_end: 0,
            }
        } else {
            let next_start = date.succ_opt().unwrap_or(date).and_time(self.start);
            WindowDecision {
                allowed: false,
                ms_until_next_window: (next_start - now_naive).num_milliseconds(),
                ms_until_window_end: 0,
            }
        }
    }
}

/// Parse `"HH:MM"` (seconds optional) into a `NaiveTime`.
fn parse_window_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            AppError::configuration(format!(
                "Invalid window time '{value}': expected HH:MM"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> AccessWindow {
        AccessWindow::new(
            NaiveTime::from_hms_opt(5, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, h, m, s).unwrap()
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let w = window();
        assert!(w.evaluate(at(5, 30, 0), StaffRole::Staff).allowed);
        assert!(w.evaluate(at(21, 30, 0), StaffRole::Staff).allowed);
        assert!(!w.evaluate(at(5, 29, 59), StaffRole::Staff).allowed);
        assert!(!w.evaluate(at(21, 30, 1), StaffRole::Staff).allowed);
    }

    #[test]
    fn test_admin_always_allowed() {
        let w = window();
        for now in [at(0, 0, 0), at(3, 15, 42), at(12, 0, 0), at(23, 59, 59)] {
            let decision = w.evaluate(now, StaffRole::Admin);
            assert!(decision.allowed);
            assert_eq!(decision.ms_until_next_window, 0);
            assert_eq!(decision.ms_until_window_end, 0);
        }
    }

    #[test]
    fn test_time_until_window_end() {
        let w = window();
        let decision = w.evaluate(at(21, 25, 0), StaffRole::Staff);
        assert!(decision.allowed);
        assert_eq!(decision.ms_until_window_end, 5 * 60 * 1000);
        assert_eq!(decision.ms_until_next_window, 0);
    }

    #[test]
    fn test_time_until_next_window_before_start() {
        let w = window();
        let decision = w.evaluate(at(5, 0, 0), StaffRole::Staff);
        assert!(!decision.allowed);
        assert_eq!(decision.ms_until_next_window, 30 * 60 * 1000);
        assert_eq!(decision.ms_until_window_end, 0);
    }

    #[test]
    fn test_time_until_next_window_after_end_crosses_midnight() {
        let w = window();
        let decision = w.evaluate(at(22, 0, 0), StaffRole::Staff);
        assert!(!decision.allowed);
        // 22:00 -> 05:30 next day = 7.5 hours
        assert_eq!(decision.ms_until_next_window, 7 * 3600 * 1000 + 30 * 60 * 1000);
    }

    #[test]
    fn test_utc_offset_shifts_the_window() {
        let w = AccessWindow::new(
            NaiveTime::from_hms_opt(5, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
            FixedOffset::east_opt(2 * 3600).unwrap(),
        );
        // 03:30 UTC is 05:30 local at UTC+2: exactly the window start.
        assert!(w.evaluate(at(3, 30, 0), StaffRole::Staff).allowed);
        assert!(!w.evaluate(at(3, 29, 59), StaffRole::Staff).allowed);
    }

    #[test]
    fn test_from_config_validates() {
        let ok = AccessWindow::from_config(&AccessConfig {
            window_start: "05:30".to_string(),
            window_end: "21:30".to_string(),
            utc_offset_minutes: 420,
            recheck_interval_seconds: 60,
        });
        assert!(ok.is_ok());

        let inverted = AccessWindow::from_config(&AccessConfig {
            window_start: "22:00".to_string(),
            window_end: "06:00".to_string(),
            utc_offset_minutes: 0,
            recheck_interval_seconds: 60,
        });
        assert!(inverted.is_err());

        let garbage = AccessWindow::from_config(&AccessConfig {
            window_start: "half past five".to_string(),
            window_end: "21:30".to_string(),
            utc_offset_minutes: 0,
            recheck_interval_seconds: 60,
        });
        assert!(garbage.is_err());
    }
}
