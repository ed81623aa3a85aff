//! Caller-facing session handlers — open and close.

use axum::Json;
use axum::extract::State;
use bytes::Bytes;
use tracing::error;

use staffhub_entity::session::CloseReason;

use crate::dto::request::CloseSessionRequest;
use crate::dto::response::{ApiResponse, MessageResponse, OpenSessionResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/sessions/open
///
/// Records a session for the caller after the external identity layer has
/// authenticated them, and arms the window guard. Persistence failure is
/// not surfaced as an error; session tracking never blocks login.
pub async fn open_session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<ApiResponse<OpenSessionResponse>> {
    let session = state
        .session_manager
        .open(
            auth.user_id,
            auth.role,
            auth.ip_address.clone(),
            auth.user_agent.clone(),
        )
        .await;

    if let Some(session) = &session {
        state.guard.arm(session);
    }

    Json(ApiResponse::ok(OpenSessionResponse { session }))
}

/// POST /api/sessions/close
///
/// Closes all of the caller's active sessions and cancels their watchers.
/// Succeeds unconditionally: the body is parsed leniently (an absent or
/// malformed reason becomes `manual`, matching the page-unload beacon),
/// and a persistence failure is logged rather than surfaced, since closing
/// is harmless to retry.
pub async fn close_session(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> Json<ApiResponse<MessageResponse>> {
    let reason_value = serde_json::from_slice::<CloseSessionRequest>(&body)
        .ok()
        .and_then(|req| req.reason);
    let reason = CloseReason::parse_lenient(reason_value.as_deref());

    state.guard.disarm_user(auth.user_id);

    if let Err(e) = state.session_manager.close_all(auth.user_id, reason).await {
        error!(
            user_id = %auth.user_id,
            error = %e,
            "Failed to close sessions; will be swept on the next pass"
        );
    }

    Json(ApiResponse::ok(MessageResponse {
        message: "Session closed".to_string(),
    }))
}
