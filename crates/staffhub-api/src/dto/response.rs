//! Response DTOs.

use serde::{Deserialize, Serialize};

use staffhub_core::types::pagination::PageResponse;
use staffhub_entity::session::Session;
use staffhub_entity::session::model::SessionSummary;
use staffhub_service::session::SessionWithPresence;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Current access-window state for the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AccessStateResponse {
    /// Whether interactive access is currently permitted.
    pub allowed: bool,
    /// Milliseconds until the next window opens (0 while allowed).
    pub ms_until_next_window: i64,
    /// Milliseconds until the current window ends (0 while denied).
    pub ms_until_window_end: i64,
    /// Advertised concurrent-session limit. Policy value, not enforced.
    pub concurrent_session_limit: u32,
}

/// Response to opening a session.
///
/// `session` is `null` when the record could not be persisted; session
/// tracking never fails the authentication flow.
#[derive(Debug, Clone, Serialize)]
pub struct OpenSessionResponse {
    /// The recorded session, if persistence succeeded.
    pub session: Option<Session>,
}

/// Number of sessions affected by a close operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedCountResponse {
    /// How many sessions transitioned to inactive.
    pub closed: u64,
}

/// Session history page plus the dashboard summary.
#[derive(Debug, Clone, Serialize)]
pub struct SessionHistoryResponse {
    /// The requested page, with presence derived at read time.
    pub sessions: PageResponse<SessionWithPresence>,
    /// Aggregate statistics.
    pub summary: SessionSummary,
}
