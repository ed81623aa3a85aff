//! Manager/admin session views with derived presence and summary
//! aggregates.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use serde::Serialize;
use uuid::Uuid;

use staffhub_access::clock::ClockSource;
use staffhub_access::session::SessionManager;
use staffhub_core::config::session::SessionConfig;
use staffhub_core::error::AppError;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_database::repositories::session::SessionRepository;
use staffhub_entity::presence::PresenceStatus;
use staffhub_entity::session::model::SessionSummary;
use staffhub_entity::session::{Session, SessionStatus};

use crate::context::RequestContext;

/// A session joined with its presence, derived at read time.
#[derive(Debug, Clone, Serialize)]
pub struct SessionWithPresence {
    /// The persisted session.
    #[serde(flatten)]
    pub session: Session,
    /// Presence derived from status and login recency. Never persisted.
    pub presence: PresenceStatus,
}

/// Session listing and history for manager/admin views.
#[derive(Clone)]
pub struct SessionService {
    /// Session persistence for queries.
    repo: Arc<SessionRepository>,
    /// Lifecycle manager for presence derivation.
    manager: Arc<SessionManager>,
    /// Synchronized clock.
    clock: Arc<dyn ClockSource>,
    /// Summary tuning.
    config: SessionConfig,
    /// Deployment's fixed UTC offset, for "today" boundaries.
    utc_offset: FixedOffset,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(
        repo: Arc<SessionRepository>,
        manager: Arc<SessionManager>,
        clock: Arc<dyn ClockSource>,
        config: SessionConfig,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            repo,
            manager,
            clock,
            config,
            utc_offset,
        }
    }

    /// Lists all active sessions with derived presence (manager or admin).
    pub async fn list_active(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<SessionWithPresence>, AppError> {
        self.require_manager(ctx)?;

        let sessions = self.repo.find_all_active().await?;
        Ok(sessions.into_iter().map(|s| self.with_presence(s)).collect())
    }

    /// Lists active sessions for one user, newest login first.
    pub async fn list_active_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
    ) -> Result<Vec<SessionWithPresence>, AppError> {
        self.require_manager(ctx)?;

        let sessions = self.repo.find_active_by_user(user_id).await?;
        Ok(sessions.into_iter().map(|s| self.with_presence(s)).collect())
    }

    /// Paginated session history with derived presence and the summary
    /// aggregate (manager or admin).
    pub async fn history(
        &self,
        ctx: &RequestContext,
        status: Option<SessionStatus>,
        user_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<(PageResponse<SessionWithPresence>, SessionSummary), AppError> {
        self.require_manager(ctx)?;

        let sessions = self.repo.search(status, user_id, &page).await?;
        let page_with_presence = sessions.map(|s| self.with_presence(s));

        let summary = self
            .repo
            .summary(self.today_start(), self.summary_window_start())
            .await?;

        Ok((page_with_presence, summary))
    }

    fn with_presence(&self, session: Session) -> SessionWithPresence {
        let presence = self.manager.presence_of(&session);
        SessionWithPresence { session, presence }
    }

    fn require_manager(&self, ctx: &RequestContext) -> Result<(), AppError> {
        if !ctx.is_manager_or_above() {
            return Err(AppError::authorization(
                "Manager or admin access required to view sessions",
            ));
        }
        Ok(())
    }

    /// Local midnight in the deployment's offset, as UTC.
    fn today_start(&self) -> DateTime<Utc> {
        let now = self.clock.now();
        let local_midnight = now
            .with_timezone(&self.utc_offset)
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_else(|| now.naive_utc());

        match self.utc_offset.from_local_datetime(&local_midnight).single() {
            Some(midnight) => midnight.with_timezone(&Utc),
            None => now,
        }
    }

    fn summary_window_start(&self) -> DateTime<Utc> {
        self.clock.now() - Duration::days(self.config.summary_window_days as i64)
    }
}
