//! Audit record repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use staffhub_core::error::{AppError, ErrorKind};
use staffhub_core::result::AppResult;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_entity::audit::model::{AuditRecord, CreateAuditRecord};

/// Repository for append-only audit records.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    /// Create a new audit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an audit record.
    pub async fn create(&self, data: &CreateAuditRecord) -> AppResult<AuditRecord> {
        sqlx::query_as::<_, AuditRecord>(
            "INSERT INTO audit_records \
               (user_id, action, status_code, ip_address, user_agent, request_body, response_body) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.action)
        .bind(data.status_code)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(&data.request_body)
        .bind(&data.response_body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit record", e))
    }

    /// Search audit records with filters, newest first.
    pub async fn search(
        &self,
        user_id: Option<Uuid>,
        action: Option<&str>,
        status_code: Option<i32>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditRecord>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if user_id.is_some() {
            conditions.push(format!("user_id = ${param_idx}"));
            param_idx += 1;
        }
        if action.is_some() {
            conditions.push(format!("action ILIKE ${param_idx}"));
            param_idx += 1;
        }
        if status_code.is_some() {
            conditions.push(format!("status_code = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM audit_records {where_clause}");
        let select_sql = format!(
            "SELECT * FROM audit_records {where_clause} ORDER BY created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditRecord>(&select_sql);

        if let Some(uid) = user_id {
            count_query = count_query.bind(uid);
            select_query = select_query.bind(uid);
        }
        if let Some(a) = action {
            let pattern = format!("%{a}%");
            count_query = count_query.bind(pattern.clone());
            select_query = select_query.bind(pattern);
        }
        if let Some(code) = status_code {
            count_query = count_query.bind(code);
            select_query = select_query.bind(code);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count audit records", e)
        })?;

        let records = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search audit records", e)
            })?;

        Ok(PageResponse::new(
            records,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
