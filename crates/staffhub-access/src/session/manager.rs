//! Session lifecycle manager — open, close, and presence derivation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use staffhub_core::config::session::SessionConfig;
use staffhub_core::result::AppResult;
use staffhub_database::repositories::session::SessionRepository;
use staffhub_entity::presence::PresenceStatus;
use staffhub_entity::session::model::CreateSession;
use staffhub_entity::session::{CloseReason, Session};
use staffhub_entity::user::StaffRole;

use crate::clock::ClockSource;

/// Session operations the enforcement guard needs.
///
/// Split out as a trait so guard behavior is testable without a database.
#[async_trait]
pub trait SessionControl: Send + Sync {
    /// Close one session. A no-op when the session is already closed.
    async fn close_session(&self, session_id: Uuid, reason: CloseReason) -> AppResult<()>;

    /// Close every active session for a user. Returns the number closed.
    async fn close_all_for_user(&self, user_id: Uuid, reason: CloseReason) -> AppResult<u64>;

    /// List all active sessions.
    async fn list_active(&self) -> AppResult<Vec<Session>>;
}

/// Manages the session lifecycle: `NONE → ACTIVE → CLOSED`, terminal.
///
/// There is no re-opening; a new login creates a new session. All state
/// coordination happens through the conditional update in the repository,
/// never through in-process locks.
#[derive(Clone)]
pub struct SessionManager {
    /// Session persistence.
    repo: Arc<SessionRepository>,
    /// Synchronized clock for server-authoritative timestamps.
    clock: Arc<dyn ClockSource>,
    /// Presence and summary tuning.
    config: SessionConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        repo: Arc<SessionRepository>,
        clock: Arc<dyn ClockSource>,
        config: SessionConfig,
    ) -> Self {
        Self {
            repo,
            clock,
            config,
        }
    }

    /// Records a new session after the external identity layer has
    /// authenticated the user.
    ///
    /// Session tracking is observability, not authorization: a persistence
    /// failure is logged and swallowed so it can never fail the surrounding
    /// authentication flow.
    pub async fn open(
        &self,
        user_id: Uuid,
        role: StaffRole,
        ip_address: String,
        user_agent: Option<String>,
    ) -> Option<Session> {
        let data = CreateSession {
            user_id,
            role,
            login_time: self.clock.now(),
            ip_address,
            user_agent,
        };

        match self.repo.create(&data).await {
            Ok(session) => {
                info!(
                    user_id = %user_id,
                    session_id = %session.id,
                    role = %role,
                    "Session opened"
                );
                Some(session)
            }
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to record session; authentication continues"
                );
                None
            }
        }
    }

    /// Closes a session. Idempotent: closing an already-closed session is a
    /// no-op, and the reason does not change the resulting state.
    pub async fn close(&self, session_id: Uuid, reason: CloseReason) -> AppResult<Option<Session>> {
        let closed = self.repo.close(session_id, reason, self.clock.now()).await?;

        match &closed {
            Some(session) => {
                info!(
                    session_id = %session.id,
                    user_id = %session.user_id,
                    reason = %reason,
                    duration_minutes = session.session_duration_minutes,
                    "Session closed"
                );
            }
            None => {
                debug!(session_id = %session_id, "Close requested for non-active session");
            }
        }

        Ok(closed)
    }

    /// Closes every active session for a user (multiple tabs/devices).
    pub async fn close_all(&self, user_id: Uuid, reason: CloseReason) -> AppResult<u64> {
        let closed = self
            .repo
            .close_all_for_user(user_id, reason, self.clock.now())
            .await?;

        if closed > 0 {
            info!(
                user_id = %user_id,
                reason = %reason,
                closed = closed,
                "Closed all active sessions for user"
            );
        }

        Ok(closed)
    }

    /// Derives the presence classification for a session at synchronized
    /// "now".
    pub fn presence_of(&self, session: &Session) -> PresenceStatus {
        session.presence(self.clock.now(), self.recency_threshold())
    }

    /// The configured online/away recency threshold.
    pub fn recency_threshold(&self) -> Duration {
        Duration::minutes(self.config.presence_recency_minutes as i64)
    }
}

#[async_trait]
impl SessionControl for SessionManager {
    async fn close_session(&self, session_id: Uuid, reason: CloseReason) -> AppResult<()> {
        self.close(session_id, reason).await.map(|_| ())
    }

    async fn close_all_for_user(&self, user_id: Uuid, reason: CloseReason) -> AppResult<u64> {
        self.close_all(user_id, reason).await
    }

    async fn list_active(&self) -> AppResult<Vec<Session>> {
        self.repo.find_all_active().await
    }
}
