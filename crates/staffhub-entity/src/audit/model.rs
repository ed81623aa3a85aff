//! Audit record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable, append-only record of a privileged operation.
///
/// A missing record is an observability gap, never a correctness failure:
/// writes are best-effort and the audited operation's outcome does not
/// depend on them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// The user who performed the action.
    pub user_id: Uuid,
    /// The action performed, as `"METHOD /path"`.
    pub action: String,
    /// HTTP status code of the response.
    pub status_code: i32,
    /// IP address of the actor.
    pub ip_address: Option<String>,
    /// User-Agent of the actor.
    pub user_agent: Option<String>,
    /// Captured request body (JSON, truncated to the configured cap).
    pub request_body: Option<serde_json::Value>,
    /// Captured response body (JSON, truncated to the configured cap).
    pub response_body: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditRecord {
    /// The user who performed the action.
    pub user_id: Uuid,
    /// The action performed, as `"METHOD /path"`.
    pub action: String,
    /// HTTP status code of the response.
    pub status_code: i32,
    /// Actor's IP address.
    pub ip_address: Option<String>,
    /// Actor's User-Agent.
    pub user_agent: Option<String>,
    /// Captured request body.
    pub request_body: Option<serde_json::Value>,
    /// Captured response body.
    pub response_body: Option<serde_json::Value>,
}
