//! Best-effort audit recording and admin search.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use staffhub_core::error::AppError;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_database::repositories::audit::AuditRepository;
use staffhub_entity::audit::model::{AuditRecord, CreateAuditRecord};

use crate::context::RequestContext;

/// Appends and searches immutable audit records.
#[derive(Debug, Clone)]
pub struct AuditService {
    /// Audit persistence.
    repo: Arc<AuditRepository>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(repo: Arc<AuditRepository>) -> Self {
        Self { repo }
    }

    /// Appends one audit record, fire-and-forget.
    ///
    /// The insert runs on a detached task; a failure is logged and the
    /// record dropped. The audited operation's response has already been
    /// determined and must never be affected.
    pub fn record(&self, record: CreateAuditRecord) {
        let repo = Arc::clone(&self.repo);
        tokio::spawn(async move {
            if let Err(e) = repo.create(&record).await {
                warn!(
                    action = %record.action,
                    user_id = %record.user_id,
                    error = %e,
                    "Audit write failed; record dropped"
                );
            }
        });
    }

    /// Searches the audit trail (admin only).
    pub async fn search(
        &self,
        ctx: &RequestContext,
        user_id: Option<Uuid>,
        action: Option<&str>,
        status_code: Option<i32>,
        page: PageRequest,
    ) -> Result<PageResponse<AuditRecord>, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::authorization(
                "Admin access required to search the audit trail",
            ));
        }

        self.repo.search(user_id, action, status_code, &page).await
    }
}
