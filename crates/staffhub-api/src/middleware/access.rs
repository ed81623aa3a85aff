//! Access-window enforcement middleware.

use axum::Json;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::dto::response::ApiErrorResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Gates protected routes on the access window.
///
/// On entering a protected context the guard refreshes the clock and
/// evaluates the policy. A denied caller has their sessions proactively
/// closed, and the denial response carries the wait until the next window
/// so the client can present it.
///
/// Requests without a valid token pass through: the handler's `AuthUser`
/// extractor produces the 401.
pub async fn enforce_access_window(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let auth = AuthUser::from_request_parts(&mut parts, &state).await;
    let request = Request::from_parts(parts, body);

    let auth = match auth {
        Ok(auth) => auth,
        Err(_) => return next.run(request).await,
    };

    let decision = state.guard.check(auth.user_id, auth.role).await;
    if !decision.allowed {
        let body = ApiErrorResponse {
            error: "OUTSIDE_ACCESS_WINDOW".to_string(),
            message: "Access is not permitted at this time".to_string(),
            details: Some(serde_json::json!({
                "ms_until_next_window": decision.ms_until_next_window,
            })),
        };
        return (StatusCode::FORBIDDEN, Json(body)).into_response();
    }

    next.run(request).await
}
