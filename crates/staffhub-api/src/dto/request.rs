//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use staffhub_core::types::pagination::PageRequest;

use crate::extractors::pagination::PaginationParams;

/// Body for session-close endpoints.
///
/// Every field is optional: a missing or unknown reason defaults to
/// `manual`, because closing a session is always safe to retry or default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseSessionRequest {
    /// Why the session is being closed.
    pub reason: Option<String>,
}

/// Query parameters for session history.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionHistoryQuery {
    /// Filter by lifecycle status (`active` / `inactive`).
    pub status: Option<String>,
    /// Filter by owning user.
    pub user_id: Option<Uuid>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub per_page: Option<u64>,
}

impl SessionHistoryQuery {
    /// Pagination with defaults applied.
    pub fn page_request(&self) -> PageRequest {
        PaginationParams::from_parts(self.page, self.per_page).into_page_request()
    }
}

/// Query parameters for audit search.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditSearchQuery {
    /// Filter by acting user.
    pub user_id: Option<Uuid>,
    /// Filter by action substring (`"POST /api/admin"`).
    pub action: Option<String>,
    /// Filter by response status code.
    pub status_code: Option<i32>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub per_page: Option<u64>,
}

impl AuditSearchQuery {
    /// Pagination with defaults applied.
    pub fn page_request(&self) -> PageRequest {
        PaginationParams::from_parts(self.page, self.per_page).into_page_request()
    }
}
