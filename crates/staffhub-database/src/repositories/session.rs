//! Session repository implementation.
//!
//! Closure is a single conditional update on `status = 'active'`, so
//! concurrent closes (manual logout racing an auto-close) resolve without
//! locks: the second writer's update matches zero rows and is a no-op.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use staffhub_core::error::{AppError, ErrorKind};
use staffhub_core::result::AppResult;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_entity::session::model::{CreateSession, Session, SessionSummary};
use staffhub_entity::session::{CloseReason, SessionStatus};

/// Repository for session CRUD and query operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new active session.
    pub async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, role, login_time, status, ip_address, user_agent) \
             VALUES ($1, $2, $3, 'active', $4, $5) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.role)
        .bind(data.login_time)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Find a session by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// List all active sessions, newest login first.
    pub async fn find_all_active(&self) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE status = 'active' ORDER BY login_time DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active sessions", e)
        })
    }

    /// List all active sessions for a user, newest login first.
    pub async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE user_id = $1 AND status = 'active' \
             ORDER BY login_time DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active sessions", e)
        })
    }

    /// Close a session if it is still active.
    ///
    /// Returns the closed session, or `None` when the session was already
    /// inactive (or does not exist) — closing twice is a no-op, not an
    /// error. The persisted duration is rounded half-up to whole minutes,
    /// matching `staffhub_entity::session::model::duration_minutes`.
    pub async fn close(
        &self,
        session_id: Uuid,
        reason: CloseReason,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "UPDATE sessions SET status = 'inactive', logout_time = $2, close_reason = $3, \
             session_duration_minutes = ROUND(EXTRACT(EPOCH FROM ($2 - login_time)) / 60.0)::INT \
             WHERE id = $1 AND status = 'active' RETURNING *",
        )
        .bind(session_id)
        .bind(now)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to close session", e))
    }

    /// Close every active session for a user. Returns the number closed.
    pub async fn close_all_for_user(
        &self,
        user_id: Uuid,
        reason: CloseReason,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET status = 'inactive', logout_time = $2, close_reason = $3, \
             session_duration_minutes = ROUND(EXTRACT(EPOCH FROM ($2 - login_time)) / 60.0)::INT \
             WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .bind(now)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to close user sessions", e)
        })?;

        Ok(result.rows_affected())
    }

    /// Paginated session history with optional status and user filters,
    /// newest login first.
    pub async fn search(
        &self,
        status: Option<SessionStatus>,
        user_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Session>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if user_id.is_some() {
            conditions.push(format!("user_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM sessions {where_clause}");
        let select_sql = format!(
            "SELECT * FROM sessions {where_clause} ORDER BY login_time DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, Session>(&select_sql);

        if let Some(s) = status {
            count_query = count_query.bind(s);
            select_query = select_query.bind(s);
        }
        if let Some(uid) = user_id {
            count_query = count_query.bind(uid);
            select_query = select_query.bind(uid);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count sessions", e)
        })?;

        let sessions = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search sessions", e)
            })?;

        Ok(PageResponse::new(
            sessions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Aggregate summary for the manager dashboard.
    ///
    /// `today_start` is local midnight in the deployment's offset;
    /// `closed_since` bounds the average-duration window.
    pub async fn summary(
        &self,
        today_start: DateTime<Utc>,
        closed_since: DateTime<Utc>,
    ) -> AppResult<SessionSummary> {
        sqlx::query_as::<_, SessionSummary>(
            "SELECT \
               (SELECT COUNT(DISTINCT user_id) FROM sessions WHERE status = 'active') AS active_users, \
               (SELECT COUNT(*) FROM sessions WHERE login_time >= $1) AS logins_today, \
               (SELECT AVG(session_duration_minutes)::FLOAT8 FROM sessions \
                  WHERE status = 'inactive' AND logout_time >= $2) AS avg_session_minutes",
        )
        .bind(today_start)
        .bind(closed_since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute session summary", e)
        })
    }
}
