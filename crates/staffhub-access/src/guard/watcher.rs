//! Per-session watcher task that forces closure at window end.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::sync::watch;
use tracing::{error, info};
use uuid::Uuid;

use staffhub_entity::session::CloseReason;
use staffhub_entity::user::StaffRole;

use crate::clock::ClockSource;
use crate::session::SessionControl;
use crate::window::AccessWindow;

use super::registry::GuardRegistry;

/// Floor on the re-check sleep so an evaluation landing exactly on the
/// window boundary cannot spin.
const MIN_SLEEP: StdDuration = StdDuration::from_millis(50);

/// One armed watcher: re-evaluates the window on the configured interval
/// and closes the session with `time_restriction` when the window ends.
///
/// Each loop iteration recomputes the deadline from the policy, so the
/// deferred close is effectively cancelled and re-armed on every re-check;
/// a single session can never fire twice.
pub(crate) struct Watcher {
    pub session_id: Uuid,
    pub role: StaffRole,
    pub window: AccessWindow,
    pub clock: Arc<dyn ClockSource>,
    pub sessions: Arc<dyn SessionControl>,
    pub recheck_interval: StdDuration,
    pub cancel: watch::Receiver<bool>,
    pub registry: GuardRegistry,
}

impl Watcher {
    pub(crate) async fn run(mut self) {
        loop {
            let decision = self.window.evaluate(self.clock.now(), self.role);

            if !decision.allowed {
                if let Err(e) = self
                    .sessions
                    .close_session(self.session_id, CloseReason::TimeRestriction)
                    .await
                {
                    error!(
                        session_id = %self.session_id,
                        error = %e,
                        "Failed to close session at window end"
                    );
                } else {
                    info!(
                        session_id = %self.session_id,
                        "Access window ended; session closed"
                    );
                }
                break;
            }

            let until_end = StdDuration::from_millis(decision.ms_until_window_end.max(0) as u64);
            let sleep_for = self.recheck_interval.min(until_end).max(MIN_SLEEP);

            tokio::select! {
                _ = self.cancel.changed() => break,
                _ = tokio::time::sleep(sleep_for) => {}
            }
        }

        self.registry.remove_completed(self.session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};

    use staffhub_core::result::AppResult;
    use staffhub_entity::session::Session;

    /// Clock that starts at a fixed instant and advances with tokio's
    /// (pausable) time.
    #[derive(Debug, Clone, Copy)]
    struct SteppedClock {
        base: DateTime<Utc>,
        started: tokio::time::Instant,
    }

    impl SteppedClock {
        fn starting_at(base: DateTime<Utc>) -> Self {
            Self {
                base,
                started: tokio::time::Instant::now(),
            }
        }
    }

    #[async_trait]
    impl ClockSource for SteppedClock {
        fn now(&self) -> DateTime<Utc> {
            self.base
                + chrono::Duration::from_std(self.started.elapsed()).unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct RecordingControl {
        closed: Mutex<Vec<(Uuid, CloseReason)>>,
    }

    #[async_trait]
    impl SessionControl for RecordingControl {
        async fn close_session(&self, session_id: Uuid, reason: CloseReason) -> AppResult<()> {
            self.closed.lock().unwrap().push((session_id, reason));
            Ok(())
        }

        async fn close_all_for_user(&self, _user_id: Uuid, _reason: CloseReason) -> AppResult<u64> {
            Ok(0)
        }

        async fn list_active(&self) -> AppResult<Vec<Session>> {
            Ok(Vec::new())
        }
    }

    fn test_window() -> AccessWindow {
        AccessWindow::new(
            chrono::NaiveTime::from_hms_opt(5, 30, 0).unwrap(),
            chrono::NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
            chrono::FixedOffset::east_opt(0).unwrap(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_closed_when_window_ends() {
        // Login at 21:25 — the window ends in five minutes.
        let clock = Arc::new(SteppedClock::starting_at(
            Utc.with_ymd_and_hms(2026, 3, 9, 21, 25, 0).unwrap(),
        ));
        let control = Arc::new(RecordingControl::default());
        let registry = GuardRegistry::new();
        let session_id = Uuid::new_v4();

        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let watcher = Watcher {
            session_id,
            role: StaffRole::Staff,
            window: test_window(),
            clock: clock.clone(),
            sessions: control.clone(),
            recheck_interval: StdDuration::from_secs(60),
            cancel: cancel_rx,
            registry: registry.clone(),
        };

        watcher.run().await;

        let closed = control.closed.lock().unwrap().clone();
        assert_eq!(closed, vec![(session_id, CloseReason::TimeRestriction)]);
        assert_eq!(registry.armed_count(), 0);
        // Fired at the window end, not before.
        assert!(clock.now() >= Utc.with_ymd_and_hms(2026, 3, 9, 21, 30, 0).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_watcher_never_closes() {
        let clock = Arc::new(SteppedClock::starting_at(
            Utc.with_ymd_and_hms(2026, 3, 9, 21, 25, 0).unwrap(),
        ));
        let control = Arc::new(RecordingControl::default());
        let registry = GuardRegistry::new();
        let session_id = Uuid::new_v4();

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let watcher = Watcher {
            session_id,
            role: StaffRole::Staff,
            window: test_window(),
            clock: clock.clone(),
            sessions: control.clone(),
            recheck_interval: StdDuration::from_secs(60),
            cancel: cancel_rx,
            registry: registry.clone(),
        };

        let task = tokio::spawn(watcher.run());
        tokio::time::sleep(StdDuration::from_secs(30)).await;
        let _ = cancel_tx.send(true);
        task.await.unwrap();

        assert!(control.closed.lock().unwrap().is_empty());
        assert_eq!(registry.armed_count(), 0);
    }
}
