//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use staffhub_access::clock::ClockSynchronizer;
use staffhub_access::guard::AccessGuard;
use staffhub_access::identity::TokenDecoder;
use staffhub_access::session::SessionManager;
use staffhub_core::config::AppConfig;
use staffhub_database::repositories::audit::AuditRepository;
use staffhub_database::repositories::session::SessionRepository;
use staffhub_service::audit::AuditService;
use staffhub_service::session::SessionService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    /// Synchronized clock
    pub clock: Arc<ClockSynchronizer>,
    /// Identity token decoder
    pub token_decoder: Arc<TokenDecoder>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// Access enforcement guard
    pub guard: Arc<AccessGuard>,

    /// Session repository
    pub session_repo: Arc<SessionRepository>,
    /// Audit repository
    pub audit_repo: Arc<AuditRepository>,

    /// Session viewing service
    pub session_service: Arc<SessionService>,
    /// Audit recording and search service
    pub audit_service: Arc<AuditService>,
}
