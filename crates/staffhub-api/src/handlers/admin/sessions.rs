//! Admin session management handlers.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use bytes::Bytes;
use uuid::Uuid;

use staffhub_entity::session::{CloseReason, SessionStatus};
use staffhub_service::session::SessionWithPresence;

use crate::dto::request::{CloseSessionRequest, SessionHistoryQuery};
use crate::dto::response::{ApiResponse, ClosedCountResponse, SessionHistoryResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::{require_admin, require_manager};
use crate::state::AppState;

/// GET /api/admin/sessions/active
pub async fn list_active(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<SessionWithPresence>>>, ApiError> {
    require_manager(&auth)?;
    let sessions = state.session_service.list_active(&auth).await?;
    Ok(Json(ApiResponse::ok(sessions)))
}

/// GET /api/admin/users/{id}/sessions/active
pub async fn list_active_for_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<SessionWithPresence>>>, ApiError> {
    require_manager(&auth)?;
    let sessions = state
        .session_service
        .list_active_for_user(&auth, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(sessions)))
}

/// GET /api/admin/sessions
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SessionHistoryQuery>,
) -> Result<Json<ApiResponse<SessionHistoryResponse>>, ApiError> {
    require_manager(&auth)?;

    let status = query
        .status
        .as_deref()
        .map(SessionStatus::from_str)
        .transpose()?;

    let (sessions, summary) = state
        .session_service
        .history(&auth, status, query.user_id, query.page_request())
        .await?;

    Ok(Json(ApiResponse::ok(SessionHistoryResponse {
        sessions,
        summary,
    })))
}

/// POST /api/admin/sessions/{id}/close
pub async fn close_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<ClosedCountResponse>>, ApiError> {
    require_admin(&auth)?;

    let reason = parse_reason(&body);
    state.guard.disarm(session_id);

    let closed = state.session_manager.close(session_id, reason).await?;

    Ok(Json(ApiResponse::ok(ClosedCountResponse {
        closed: u64::from(closed.is_some()),
    })))
}

/// POST /api/admin/users/{id}/sessions/close
pub async fn close_user_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<ClosedCountResponse>>, ApiError> {
    require_admin(&auth)?;

    let reason = parse_reason(&body);
    state.guard.disarm_user(user_id);

    let closed = state.session_manager.close_all(user_id, reason).await?;

    Ok(Json(ApiResponse::ok(ClosedCountResponse { closed })))
}

fn parse_reason(body: &Bytes) -> CloseReason {
    let reason_value = serde_json::from_slice::<CloseSessionRequest>(body)
        .ok()
        .and_then(|req| req.reason);
    CloseReason::parse_lenient(reason_value.as_deref())
}
