//! Session entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::presence::PresenceStatus;
use crate::user::StaffRole;

use super::{CloseReason, SessionStatus};

/// One authenticated login-to-logout span for a staff member.
///
/// Created on successful authentication and mutated exactly once, at
/// closure. Never deleted by this application; retention is an external
/// data-lifecycle policy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The staff member this session belongs to.
    pub user_id: Uuid,
    /// Role at login time. Captured so window enforcement never needs the
    /// external user store.
    pub role: StaffRole,
    /// When the session was created (server-authoritative).
    pub login_time: DateTime<Utc>,
    /// When the session was closed. Set exactly once.
    pub logout_time: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Why the session was closed, if it has been.
    pub close_reason: Option<CloseReason>,
    /// IP address from which the session was created. Informational.
    pub ip_address: String,
    /// User-Agent header value. Informational.
    pub user_agent: Option<String>,
    /// Whole minutes between login and logout, set at closure.
    pub session_duration_minutes: Option<i32>,
}

impl Session {
    /// Check whether the session is still open.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Derive the presence classification for this session.
    ///
    /// Closed sessions are always offline. Active sessions are online while
    /// the login is within `recency_threshold` of `now`, away after that.
    pub fn presence(&self, now: DateTime<Utc>, recency_threshold: Duration) -> PresenceStatus {
        if self.status == SessionStatus::Inactive {
            return PresenceStatus::Offline;
        }
        if now - self.login_time <= recency_threshold {
            PresenceStatus::Online
        } else {
            PresenceStatus::Away
        }
    }
}

/// Whole-minute duration between login and logout, rounded half-up.
///
/// The SQL closure statement computes the persisted value with the same
/// rule (`ROUND(EXTRACT(EPOCH ...) / 60.0)`); this helper is the reference
/// definition.
pub fn duration_minutes(login: DateTime<Utc>, logout: DateTime<Utc>) -> i64 {
    let seconds = (logout - login).num_milliseconds() as f64 / 1000.0;
    (seconds / 60.0).round() as i64
}

/// Aggregate session statistics for the manager dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionSummary {
    /// Distinct users with at least one active session.
    pub active_users: i64,
    /// Sessions opened since local midnight.
    pub logins_today: i64,
    /// Average closed-session duration over the trailing window, in minutes.
    pub avg_session_minutes: Option<f64>,
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The staff member this session belongs to.
    pub user_id: Uuid,
    /// Role at login time.
    pub role: StaffRole,
    /// Login timestamp from the synchronized clock.
    pub login_time: DateTime<Utc>,
    /// IP address of the client.
    pub ip_address: String,
    /// User-Agent header.
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session_at(login: DateTime<Utc>, status: SessionStatus) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: StaffRole::Staff,
            login_time: login,
            logout_time: None,
            status,
            close_reason: None,
            ip_address: "203.0.113.7".to_string(),
            user_agent: None,
            session_duration_minutes: None,
        }
    }

    #[test]
    fn test_duration_rounds_half_up() {
        let login = Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap();
        let logout = Utc.with_ymd_and_hms(2026, 3, 9, 10, 47, 30).unwrap();
        assert_eq!(duration_minutes(login, logout), 48);

        let just_under = Utc.with_ymd_and_hms(2026, 3, 9, 10, 47, 29).unwrap();
        assert_eq!(duration_minutes(login, just_under), 47);

        let exact = Utc.with_ymd_and_hms(2026, 3, 9, 10, 47, 0).unwrap();
        assert_eq!(duration_minutes(login, exact), 47);
    }

    #[test]
    fn test_presence_online_within_threshold() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let session = session_at(now - Duration::minutes(10), SessionStatus::Active);
        assert_eq!(
            session.presence(now, Duration::minutes(15)),
            PresenceStatus::Online
        );
    }

    #[test]
    fn test_presence_away_past_threshold() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let session = session_at(now - Duration::minutes(20), SessionStatus::Active);
        assert_eq!(
            session.presence(now, Duration::minutes(15)),
            PresenceStatus::Away
        );
    }

    #[test]
    fn test_presence_offline_when_inactive() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let session = session_at(now - Duration::minutes(1), SessionStatus::Inactive);
        assert_eq!(
            session.presence(now, Duration::minutes(15)),
            PresenceStatus::Offline
        );
    }

    #[test]
    fn test_presence_boundary_is_online() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let session = session_at(now - Duration::minutes(15), SessionStatus::Active);
        assert_eq!(
            session.presence(now, Duration::minutes(15)),
            PresenceStatus::Online
        );
    }
}
