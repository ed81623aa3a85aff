//! Access enforcement guard.
//!
//! The only component with scheduling behavior: it gates protected
//! requests on the window policy and arms a cancellable per-session
//! watcher that forces closure when the window ends.

pub mod registry;
mod watcher;

pub use registry::GuardRegistry;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::sync::watch;
use tracing::{error, info};
use uuid::Uuid;

use staffhub_core::result::AppResult;
use staffhub_entity::session::{CloseReason, Session};
use staffhub_entity::user::StaffRole;

use crate::clock::ClockSource;
use crate::session::SessionControl;
use crate::window::{AccessWindow, WindowDecision};

use self::watcher::Watcher;

/// Per-request and per-session window enforcement.
#[derive(Clone)]
pub struct AccessGuard {
    window: AccessWindow,
    clock: Arc<dyn ClockSource>,
    sessions: Arc<dyn SessionControl>,
    registry: GuardRegistry,
    recheck_interval: StdDuration,
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("window", &self.window)
            .field("armed", &self.registry.armed_count())
            .finish()
    }
}

impl AccessGuard {
    /// Creates a new guard.
    pub fn new(
        window: AccessWindow,
        clock: Arc<dyn ClockSource>,
        sessions: Arc<dyn SessionControl>,
        recheck_interval_seconds: u64,
    ) -> Self {
        Self {
            window,
            clock,
            sessions,
            registry: GuardRegistry::new(),
            recheck_interval: StdDuration::from_secs(recheck_interval_seconds),
        }
    }

    /// The window this guard enforces.
    pub fn window(&self) -> &AccessWindow {
        &self.window
    }

    /// Gate one request.
    ///
    /// Refreshes the clock if the offset is stale, then evaluates the
    /// policy. On denial the caller's active sessions are proactively
    /// closed with `outside_access_hours`; the denial decision (with the
    /// wait until the next window) is returned either way. A denied
    /// window is a state, not an error.
    pub async fn check(&self, user_id: Uuid, role: StaffRole) -> WindowDecision {
        self.clock.refresh_if_stale().await;
        let decision = self.window.evaluate(self.clock.now(), role);

        if !decision.allowed {
            self.registry.disarm_user(user_id);
            match self
                .sessions
                .close_all_for_user(user_id, CloseReason::OutsideAccessHours)
                .await
            {
                Ok(closed) if closed > 0 => {
                    info!(
                        user_id = %user_id,
                        closed = closed,
                        "Denied outside access window; open sessions closed"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    error!(
                        user_id = %user_id,
                        error = %e,
                        "Failed to close sessions on window denial"
                    );
                }
            }
        }

        decision
    }

    /// Evaluate the window without side effects (for the access-state view).
    pub async fn peek(&self, role: StaffRole) -> WindowDecision {
        self.clock.refresh_if_stale().await;
        self.window.evaluate(self.clock.now(), role)
    }

    /// Arms a watcher that will force-close the session when the window
    /// ends. A no-op for roles that bypass the window.
    pub fn arm(&self, session: &Session) {
        if session.role.bypasses_window() {
            return;
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.registry.insert(session.id, session.user_id, cancel_tx);

        let watcher = Watcher {
            session_id: session.id,
            role: session.role,
            window: self.window,
            clock: Arc::clone(&self.clock),
            sessions: Arc::clone(&self.sessions),
            recheck_interval: self.recheck_interval,
            cancel: cancel_rx,
            registry: self.registry.clone(),
        };

        tokio::spawn(watcher.run());
    }

    /// Cancels the watcher for a session (manual close, page close, admin
    /// close).
    pub fn disarm(&self, session_id: Uuid) {
        self.registry.disarm(session_id);
    }

    /// Cancels every watcher owned by a user.
    pub fn disarm_user(&self, user_id: Uuid) {
        self.registry.disarm_user(user_id);
    }

    /// Cancels every armed watcher. Called at graceful shutdown so no
    /// timer outlives the protected context.
    pub fn shutdown(&self) {
        let cancelled = self.registry.disarm_all();
        if cancelled > 0 {
            info!(cancelled = cancelled, "Guard watchers cancelled at shutdown");
        }
    }

    /// Server-side safety net: closes active sessions whose window has
    /// already ended (clients that vanished without a beacon). Returns the
    /// number closed.
    pub async fn sweep(&self) -> AppResult<u64> {
        let now = self.clock.now();
        let active = self.sessions.list_active().await?;
        let mut closed = 0u64;

        for session in active {
            if self.window.evaluate(now, session.role).allowed {
                continue;
            }

            self.registry.disarm(session.id);
            match self
                .sessions
                .close_session(session.id, CloseReason::TimeRestriction)
                .await
            {
                Ok(()) => closed += 1,
                Err(e) => {
                    error!(
                        session_id = %session.id,
                        error = %e,
                        "Sweep failed to close out-of-window session"
                    );
                }
            }
        }

        if closed > 0 {
            info!(closed = closed, "Out-of-window sweep closed sessions");
        }

        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};

    use staffhub_entity::session::SessionStatus;

    #[derive(Debug)]
    struct FixedClock(DateTime<Utc>);

    #[async_trait]
    impl ClockSource for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingControl {
        closed_all: Mutex<Vec<(Uuid, CloseReason)>>,
        active: Mutex<Vec<Session>>,
        closed: Mutex<Vec<(Uuid, CloseReason)>>,
    }

    #[async_trait]
    impl SessionControl for RecordingControl {
        async fn close_session(&self, session_id: Uuid, reason: CloseReason) -> AppResult<()> {
            self.closed.lock().unwrap().push((session_id, reason));
            Ok(())
        }

        async fn close_all_for_user(&self, user_id: Uuid, reason: CloseReason) -> AppResult<u64> {
            self.closed_all.lock().unwrap().push((user_id, reason));
            Ok(1)
        }

        async fn list_active(&self) -> AppResult<Vec<Session>> {
            Ok(self.active.lock().unwrap().clone())
        }
    }

    fn test_window() -> AccessWindow {
        AccessWindow::new(
            chrono::NaiveTime::from_hms_opt(5, 30, 0).unwrap(),
            chrono::NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
            chrono::FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn active_session(role: StaffRole, login: DateTime<Utc>) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role,
            login_time: login,
            logout_time: None,
            status: SessionStatus::Active,
            close_reason: None,
            ip_address: "203.0.113.7".to_string(),
            user_agent: None,
            session_duration_minutes: None,
        }
    }

    #[tokio::test]
    async fn test_denied_check_closes_sessions_with_outside_access_hours() {
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 3, 9, 23, 0, 0).unwrap(),
        ));
        let control = Arc::new(RecordingControl::default());
        let guard = AccessGuard::new(test_window(), clock, control.clone(), 60);

        let user_id = Uuid::new_v4();
        let decision = guard.check(user_id, StaffRole::Staff).await;

        assert!(!decision.allowed);
        assert!(decision.ms_until_next_window > 0);
        assert_eq!(
            control.closed_all.lock().unwrap().clone(),
            vec![(user_id, CloseReason::OutsideAccessHours)]
        );
    }

    #[tokio::test]
    async fn test_allowed_check_has_no_side_effects() {
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap(),
        ));
        let control = Arc::new(RecordingControl::default());
        let guard = AccessGuard::new(test_window(), clock, control.clone(), 60);

        let decision = guard.check(Uuid::new_v4(), StaffRole::Staff).await;

        assert!(decision.allowed);
        assert!(decision.ms_until_window_end > 0);
        assert!(control.closed_all.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_arm_skips_privileged_roles() {
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap(),
        ));
        let control = Arc::new(RecordingControl::default());
        let guard = AccessGuard::new(test_window(), clock.clone(), control.clone(), 60);

        guard.arm(&active_session(StaffRole::Admin, clock.0));
        assert_eq!(guard.registry.armed_count(), 0);

        guard.arm(&active_session(StaffRole::Staff, clock.0));
        assert_eq!(guard.registry.armed_count(), 1);

        guard.shutdown();
        assert_eq!(guard.registry.armed_count(), 0);
    }

    #[tokio::test]
    async fn test_sweep_closes_only_out_of_window_sessions() {
        // 22:00 — past the window end.
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 3, 9, 22, 0, 0).unwrap(),
        ));
        let control = Arc::new(RecordingControl::default());

        let stale = active_session(StaffRole::Staff, clock.0 - chrono::Duration::hours(2));
        let admin = active_session(StaffRole::Admin, clock.0 - chrono::Duration::hours(2));
        control
            .active
            .lock()
            .unwrap()
            .extend([stale.clone(), admin]);

        let guard = AccessGuard::new(test_window(), clock, control.clone(), 60);
        let closed = guard.sweep().await.unwrap();

        assert_eq!(closed, 1);
        assert_eq!(
            control.closed.lock().unwrap().clone(),
            vec![(stale.id, CloseReason::TimeRestriction)]
        );
    }
}
