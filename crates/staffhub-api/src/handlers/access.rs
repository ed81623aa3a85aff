//! Access-window state handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{AccessStateResponse, ApiResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/access/state
///
/// Reports the window decision for the caller's role at synchronized
/// "now". Deliberately side-effect free so a denied user can poll the
/// remaining wait time.
pub async fn access_state(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<ApiResponse<AccessStateResponse>> {
    let decision = state.guard.peek(auth.role).await;

    Json(ApiResponse::ok(AccessStateResponse {
        allowed: decision.allowed,
        ms_until_next_window: decision.ms_until_next_window,
        ms_until_window_end: decision.ms_until_window_end,
        concurrent_session_limit: state.config.session.concurrent_limit,
    }))
}
