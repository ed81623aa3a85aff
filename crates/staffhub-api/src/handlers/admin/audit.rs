//! Admin audit search handler.

use axum::Json;
use axum::extract::{Query, State};

use staffhub_core::types::pagination::PageResponse;
use staffhub_entity::audit::model::AuditRecord;

use crate::dto::request::AuditSearchQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/audit
pub async fn search_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AuditSearchQuery>,
) -> Result<Json<ApiResponse<PageResponse<AuditRecord>>>, ApiError> {
    require_admin(&auth)?;

    let records = state
        .audit_service
        .search(
            &auth,
            query.user_id,
            query.action.as_deref(),
            query.status_code,
            query.page_request(),
        )
        .await?;

    Ok(Json(ApiResponse::ok(records)))
}
